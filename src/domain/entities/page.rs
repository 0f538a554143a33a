use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size,
        }
    }

    pub fn first_page(self) -> Self {
        Self {
            page_index: 0,
            ..self
        }
    }

    pub fn offset(self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page_index)
    }

    pub fn to_page_request(self) -> PageRequest {
        PageRequest {
            page: self.page_index.saturating_add(1),
            page_size: self.page_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub current_page: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: PaginationMetadata,
}

impl<T> PagedResult<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            pagination: PaginationMetadata::default(),
        }
    }
}
