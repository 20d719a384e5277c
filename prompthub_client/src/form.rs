use std::fmt;

use log::{info, warn};
use thiserror::Error;

use crate::api::{ApiError, PromptBackend};
use crate::catalog::{self, DEFAULT_PLATFORM};
use crate::models::{PlatformType, Prompt, PromptId, PromptInput};
use crate::tags::TagEditor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Title,
    Content,
    Category,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Content => "content",
            RequiredField::Category => "category",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<RequiredField>),
    #[error("category '{category}' is not a {platform_type} category")]
    CategoryMismatch {
        category: String,
        platform_type: PlatformType,
    },
    #[error("submission already in progress")]
    AlreadySubmitting,
    #[error("Failed to create prompt.")]
    CreateFailed,
    #[error("Failed to update prompt.")]
    UpdateFailed,
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Editable fields of a prompt on the create and edit forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub description: String,
    pub content: String,
    pub platform: String,
    platform_type: PlatformType,
    category: String,
    pub tags: TagEditor,
}

impl Default for DraftForm {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftForm {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            content: String::new(),
            platform: DEFAULT_PLATFORM.to_string(),
            platform_type: PlatformType::Text,
            category: String::new(),
            tags: TagEditor::new(),
        }
    }

    pub fn from_prompt(prompt: &Prompt) -> Self {
        Self {
            title: prompt.title.clone(),
            description: prompt.description.clone(),
            content: prompt.content.clone(),
            platform: prompt.platform.clone(),
            platform_type: prompt.platform_type,
            category: prompt.category.clone(),
            tags: TagEditor::with_tags(prompt.tags.iter().cloned()),
        }
    }

    pub fn platform_type(&self) -> PlatformType {
        self.platform_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn categories(&self) -> &'static [&'static str] {
        catalog::categories_for(self.platform_type)
    }

    /// Switching type clears the category so one from the new vocabulary
    /// must be picked.
    pub fn set_platform_type(&mut self, platform_type: PlatformType) {
        if self.platform_type != platform_type {
            self.platform_type = platform_type;
            self.category.clear();
        }
    }

    pub fn set_category(&mut self, category: &str) -> Result<(), FormError> {
        if !catalog::is_category_of(self.platform_type, category) {
            return Err(FormError::CategoryMismatch {
                category: category.to_string(),
                platform_type: self.platform_type,
            });
        }
        self.category = category.to_string();
        Ok(())
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(RequiredField::Title);
        }
        if self.content.trim().is_empty() {
            missing.push(RequiredField::Content);
        }
        if self.category.is_empty() {
            missing.push(RequiredField::Category);
        }
        missing
    }

    pub fn validate(&self) -> Result<PromptInput, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }
        Ok(PromptInput {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            platform: self.platform.clone(),
            platform_type: self.platform_type,
            category: self.category.clone(),
            tags: self.tags.tags().to_vec(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PromptId),
}

/// A create or edit form together with its submit button state and the
/// message shown under it.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub draft: DraftForm,
    mode: FormMode,
    submitting: bool,
    error: Option<String>,
}

impl FormSession {
    pub fn create() -> Self {
        Self {
            draft: DraftForm::new(),
            mode: FormMode::Create,
            submitting: false,
            error: None,
        }
    }

    pub fn edit(prompt: &Prompt) -> Self {
        Self {
            draft: DraftForm::from_prompt(prompt),
            mode: FormMode::Edit(prompt.id),
            submitting: false,
            error: None,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validates and locks the form. No request may be sent when this fails.
    pub fn begin_submit(&mut self) -> Result<PromptInput, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        match self.draft.validate() {
            Ok(input) => {
                self.submitting = true;
                self.error = None;
                Ok(input)
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<Prompt, ApiError>) -> Result<Prompt, FormError> {
        self.submitting = false;
        match result {
            Ok(prompt) => {
                info!("prompt {} saved", prompt.id);
                self.mode = FormMode::Edit(prompt.id);
                Ok(prompt)
            }
            Err(err) => {
                warn!("prompt submission failed: {err}");
                let failure = match self.mode {
                    FormMode::Create => FormError::CreateFailed,
                    FormMode::Edit(_) => FormError::UpdateFailed,
                };
                self.error = Some(failure.to_string());
                Err(failure)
            }
        }
    }

    pub fn submit<B: PromptBackend>(&mut self, backend: &B) -> Result<Prompt, FormError> {
        let input = self.begin_submit()?;
        let result = match self.mode {
            FormMode::Create => backend.create_prompt(&input),
            FormMode::Edit(id) => backend.update_prompt(id, &input),
        };
        self.finish_submit(result)
    }
}
