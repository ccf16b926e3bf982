/// Offset/limit window for list queries. Callers pick the defaults; a
/// `None` limit means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: Option<u32>,
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Page {
        Page {
            offset,
            limit: Some(limit),
        }
    }

    pub fn unbounded(offset: u32) -> Page {
        Page { offset, limit: None }
    }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
