/// How a filter field turns UI input into a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterFieldKind {
    Date,           // date or datetime, stored verbatim
    Boolean,        // flag, stored verbatim
    Enum,           // one of a closed set of codes, stored verbatim
    Text,           // free text, stored verbatim
    Event,          // value nested in a UI event payload
    Page,           // zero-based page index from the pager
    PageSize,       // page size nested in a UI event payload
    Search,         // free text, phone numbers normalized
}

impl FilterFieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Enum => "enum",
            Self::Text => "text",
            Self::Event => "event",
            Self::Page => "page",
            Self::PageSize => "page_size",
            Self::Search => "search",
        }
    }

    /// Kinds that leave `page` untouched when applied
    pub fn keeps_page(&self) -> bool {
        matches!(self, Self::Page)
    }
}
