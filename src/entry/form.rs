//! The form for creating and editing entries, and its validation.

use std::num::IntErrorKind;

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    entry::{Category, Entry, EntryType, NewEntry},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
    },
};

/// The largest magnitude an entry's amount may have.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// The raw form data submitted when creating or editing an entry.
///
/// Every field is kept as text so that an invalid submission can be shown
/// back to the user exactly as they typed it.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntryForm {
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// The reasons an entry form submission can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryFormError {
    #[error("Please enter a date.")]
    MissingDate,
    #[error("\"{0}\" is not a valid date, use the format YYYY-MM-DD.")]
    InvalidDate(String),
    #[error("Please choose whether this entry is income or an expense.")]
    MissingType,
    #[error("\"{0}\" is not an entry type, choose income or expense.")]
    UnknownType(String),
    #[error("Please enter an amount.")]
    MissingAmount,
    #[error("\"{0}\" is not a whole number, enter the amount without decimals.")]
    InvalidAmount(String),
    #[error("\"{0}\" is too large, enter an amount between -1,000,000,000,000 and 1,000,000,000,000.")]
    AmountOutOfRange(String),
    #[error("Please enter a category.")]
    MissingCategory,
}

impl EntryForm {
    /// Form values for a blank entry dated `date`, with expense preselected.
    pub fn blank(date: Date) -> Self {
        Self {
            date: Some(date.to_string()),
            entry_type: Some(EntryType::Expense.as_str().to_owned()),
            ..Default::default()
        }
    }

    /// Check the submitted values and convert them into an entry.
    ///
    /// Fields are checked in the order they appear on the form, and the first
    /// problem found is returned.
    ///
    /// # Errors
    /// Returns an [EntryFormError] describing the first invalid field.
    pub fn validate(&self) -> Result<NewEntry, EntryFormError> {
        let date_text = non_blank(&self.date).ok_or(EntryFormError::MissingDate)?;
        let date = Date::parse(date_text, format_description!("[year]-[month]-[day]"))
            .map_err(|_| EntryFormError::InvalidDate(date_text.to_owned()))?;

        let type_text = non_blank(&self.entry_type).ok_or(EntryFormError::MissingType)?;
        let entry_type = type_text
            .parse::<EntryType>()
            .map_err(|_| EntryFormError::UnknownType(type_text.to_owned()))?;

        let amount_text = non_blank(&self.amount).ok_or(EntryFormError::MissingAmount)?;
        let amount = amount_text
            .parse::<i64>()
            .map_err(|error| match error.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    EntryFormError::AmountOutOfRange(amount_text.to_owned())
                }
                _ => EntryFormError::InvalidAmount(amount_text.to_owned()),
            })?;
        if !(-MAX_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            return Err(EntryFormError::AmountOutOfRange(amount_text.to_owned()));
        }

        let category = self
            .category
            .as_deref()
            .map(Category::new)
            .and_then(Result::ok)
            .ok_or(EntryFormError::MissingCategory)?;

        let description = self.description.as_deref().unwrap_or_default().trim();

        Ok(Entry::build(date, entry_type, amount, category).description(description))
    }
}

impl From<&Entry> for EntryForm {
    fn from(entry: &Entry) -> Self {
        Self {
            date: Some(entry.date.to_string()),
            entry_type: Some(entry.entry_type.as_str().to_owned()),
            amount: Some(entry.amount.to_string()),
            category: Some(entry.category.to_string()),
            description: Some(entry.description.clone()),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Render a complete entry form that posts to `action`.
///
/// `categories` are offered as suggestions for the category field.
pub fn entry_form(
    action: &str,
    submit_text: &str,
    values: &EntryForm,
    categories: &[Category],
    error_message: Option<&str>,
) -> Markup {
    html! {
        form
            action=(action)
            method="post"
            class="w-full space-y-4 md:space-y-6"
        {
            (entry_form_fields(values, categories))

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                (submit_text)
            }
        }
    }
}

fn entry_form_fields(values: &EntryForm, categories: &[Category]) -> Markup {
    let is_income = values
        .entry_type
        .as_deref()
        .and_then(|text| text.parse::<EntryType>().ok())
        == Some(EntryType::Income);

    html! {
        div
        {
            label
                for="date"
                class=(FORM_LABEL_STYLE)
            {
                "Date"
            }

            input
                name="date"
                id="date"
                type="date"
                required
                value=[values.date.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for (entry_type, checked) in [(EntryType::Expense, !is_income), (EntryType::Income, is_income)] {
                    @let id = format!("entry-type-{}", entry_type.as_str());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="type"
                            id=(id)
                            type="radio"
                            value=(entry_type.as_str())
                            checked[checked]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for=(id)
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (entry_type.label())
                        }
                    }
                }
            }
        }

        div
        {
            label
                for="amount"
                class=(FORM_LABEL_STYLE)
            {
                "Amount"
            }

            input
                name="amount"
                id="amount"
                type="number"
                step="1"
                placeholder="0"
                required
                autofocus
                value=[values.amount.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="category"
                class=(FORM_LABEL_STYLE)
            {
                "Category"
            }

            input
                name="category"
                id="category"
                type="text"
                list="category-options"
                placeholder="Category"
                required
                value=[values.category.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);

            datalist id="category-options"
            {
                @for category in categories {
                    option value=(category) {}
                }
            }
        }

        div
        {
            label
                for="description"
                class=(FORM_LABEL_STYLE)
            {
                "Description"
            }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=[values.description.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
