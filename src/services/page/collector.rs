//! Page Content Collection
//!
//! The scan service asks a collector for the current text of a tab. The host
//! environment supplies the real implementation; `StaticPageCollector` serves
//! pages registered up front (CLI runs, tests).

use async_trait::async_trait;
use dashmap::DashMap;
use policy_guardian_core::TabId;

use super::structure::PageContent;
use crate::utils::error::{AppError, AppResult};

/// Source of page text for a tab.
#[async_trait]
pub trait PageContentCollector: Send + Sync {
    /// Collect the structured text of the document currently shown in `tab_id`.
    ///
    /// Returns `AppError::ContentUnavailable` when the page cannot answer.
    async fn collect_page_text(&self, tab_id: TabId) -> AppResult<PageContent>;
}

/// Collector backed by pages registered per tab.
#[derive(Debug, Default)]
pub struct StaticPageCollector {
    pages: DashMap<TabId, PageContent>,
}

impl StaticPageCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the page shown in a tab.
    pub fn insert(&self, tab_id: TabId, content: PageContent) {
        self.pages.insert(tab_id, content);
    }

    /// Forget a tab's page.
    pub fn remove(&self, tab_id: TabId) -> Option<PageContent> {
        self.pages.remove(&tab_id).map(|(_, content)| content)
    }
}

#[async_trait]
impl PageContentCollector for StaticPageCollector {
    async fn collect_page_text(&self, tab_id: TabId) -> AppResult<PageContent> {
        self.pages
            .get(&tab_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::content_unavailable(format!("no page loaded in tab {}", tab_id)))
    }
}
