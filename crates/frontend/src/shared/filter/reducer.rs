use contracts::shared::filter::{FilterFieldKind, FilterSchema};

use super::phone::normalize_phone;
use super::value::{Filter, FilterValue};

/// Input coming from a filter widget or the pager
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    /// Zero-based page index from the pager
    Index(u32),
    /// Raw widget value
    Value(FilterValue),
    /// Value nested in a UI event payload (select change, page size picker)
    Event(FilterValue),
    /// Field cleared by the user
    Clear,
}

impl FilterInput {
    fn payload(self) -> Result<Option<FilterValue>, FilterInput> {
        match self {
            Self::Value(value) | Self::Event(value) => Ok(Some(value)),
            Self::Clear => Ok(None),
            other => Err(other),
        }
    }
}

/// Apply one widget change to a filter.
///
/// Returns a new filter; `filter` is left untouched. Page changes store the
/// 1-based page and keep everything else. Every other applied change resets
/// the filter to page 1. Keys missing from `schema` and inputs of the wrong
/// shape leave the filter unchanged and log a warning.
pub fn set_filter_value(
    filter: &Filter,
    schema: &FilterSchema,
    key: &str,
    input: FilterInput,
) -> Filter {
    let Some(kind) = schema.kind_of(key) else {
        log::warn!("Ignoring change of unregistered filter field '{}'", key);
        return filter.clone();
    };

    let mut next = filter.clone();
    match kind {
        FilterFieldKind::Page => {
            let index = match input {
                FilterInput::Index(index) => index,
                FilterInput::Value(FilterValue::Int(index)) if index >= 0 => {
                    u32::try_from(index).unwrap_or(u32::MAX)
                }
                other => return rejected(filter, key, kind, &other),
            };
            next.page = index.saturating_add(1);
            return next;
        }
        FilterFieldKind::PageSize => {
            let size = match &input {
                FilterInput::Event(value) | FilterInput::Value(value) => value
                    .as_int()
                    .filter(|size| *size > 0)
                    .and_then(|size| u32::try_from(size).ok()),
                _ => None,
            };
            match size {
                Some(size) => next.page_size = size,
                None => return rejected(filter, key, kind, &input),
            }
        }
        FilterFieldKind::Search => match input.payload() {
            Ok(Some(FilterValue::Text(text))) => {
                let value = match normalize_phone(&text) {
                    Some(phone) => FilterValue::Int(phone),
                    None => FilterValue::Text(text),
                };
                next.values.insert(key.to_string(), value);
            }
            Ok(Some(value)) => {
                next.values.insert(key.to_string(), value);
            }
            Ok(None) => {
                next.values.remove(key);
            }
            Err(other) => return rejected(filter, key, kind, &other),
        },
        FilterFieldKind::Event
        | FilterFieldKind::Date
        | FilterFieldKind::Boolean
        | FilterFieldKind::Enum
        | FilterFieldKind::Text => match input.payload() {
            Ok(Some(value)) => {
                next.values.insert(key.to_string(), value);
            }
            Ok(None) => {
                next.values.remove(key);
            }
            Err(other) => return rejected(filter, key, kind, &other),
        },
    }

    next.page = 1;
    next
}

fn rejected(filter: &Filter, key: &str, kind: FilterFieldKind, input: &FilterInput) -> Filter {
    log::warn!(
        "Ignoring {:?} for {} filter field '{}'",
        input,
        kind.as_str(),
        key
    );
    filter.clone()
}
