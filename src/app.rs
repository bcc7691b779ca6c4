use crate::api::{ApiError, NewsClient, Vocabulary};
use crate::config::StartScreen;
use crate::feed::{end_reached, Completion, FilterState, NewsItem, PageRequest, Pagination};
use crate::theme::{StyleMap, ThemeVariant};
use anyhow::Result;
use ratatui::style::Style;
use reqwest::redirect::Policy;
use std::borrow::Cow;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Create a custom redirect policy with loop detection and limited hops.
///
/// - Limits redirects to 3 hops maximum
/// - Detects redirect loops (same URL appearing twice in chain)
/// - Refuses to follow a redirect from HTTPS down to plain HTTP, since every
///   request URL carries the access token
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        let from_https = attempt
            .previous()
            .last()
            .is_some_and(|prev| prev.scheme() == "https");
        if from_https && url.scheme() != "https" {
            return attempt.error("Refusing HTTPS to HTTP redirect");
        }

        tracing::debug!(
            to = %url.host_str().unwrap_or("?"),
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Build the shared HTTP client used for every API call.
///
/// Overall request time is bounded per call by `NewsClient`, so only the
/// connect phase gets a timeout here.
pub fn build_http_client() -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .redirect(create_redirect_policy())
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .connect_timeout(std::time::Duration::from_secs(10))
        .user_agent(concat!("newsdeck/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

// ============================================================================
// Screens
// ============================================================================

/// The two feed tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenId {
    /// Full-screen story cards ("Home").
    Story,
    /// Compact filterable rows ("News Feed").
    List,
}

impl ScreenId {
    pub const ALL: [ScreenId; 2] = [ScreenId::Story, ScreenId::List];

    pub fn title(self) -> &'static str {
        match self {
            Self::Story => "Home",
            Self::List => "News Feed",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Story => 0,
            Self::List => 1,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Story => Self::List,
            Self::List => Self::Story,
        }
    }
}

impl From<StartScreen> for ScreenId {
    fn from(screen: StartScreen) -> Self {
        match screen {
            StartScreen::Home => Self::Story,
            StartScreen::Feed => Self::List,
        }
    }
}

/// One feed tab: its pagination state plus cursor and viewport.
pub struct FeedScreen {
    pub pagination: Pagination,
    /// Index of the highlighted item.
    pub selected: usize,
    /// First visible row (list screen only).
    pub offset: usize,
    /// Items visible at once. Updated by the renderer; always 1 for stories.
    pub viewport: usize,
    /// Set once the initial page load has been issued.
    pub mounted: bool,
    /// Task running this screen's in-flight page request.
    pub load_handle: Option<JoinHandle<()>>,
}

impl FeedScreen {
    pub fn new(filter: FilterState, viewport: usize) -> Self {
        Self {
            pagination: Pagination::new(filter),
            selected: 0,
            offset: 0,
            viewport: viewport.max(1),
            mounted: false,
            load_handle: None,
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        self.pagination.items()
    }

    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.pagination.items().get(self.selected)
    }

    /// Issue the initial load the first time the screen is shown.
    pub fn mount(&mut self) -> Option<PageRequest> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        self.pagination.mount()
    }

    /// Move the cursor down by `step`, asking for the next page when the
    /// cursor gets close to the end.
    pub fn nav_down(&mut self, step: usize) -> Option<PageRequest> {
        let len = self.items().len();
        if len > 0 {
            self.selected = self.selected.saturating_add(step).min(len - 1);
        }
        self.maybe_load_more()
    }

    pub fn nav_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    pub fn scroll_to_top(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) -> Option<PageRequest> {
        self.selected = self.items().len().saturating_sub(1);
        self.maybe_load_more()
    }

    pub fn refresh(&mut self) -> Option<PageRequest> {
        self.mounted = true;
        self.pagination.refresh()
    }

    fn maybe_load_more(&mut self) -> Option<PageRequest> {
        if end_reached(self.selected, self.items().len(), self.viewport) {
            self.pagination.load_more()
        } else {
            None
        }
    }

    /// Keep indices in range after the item list changed.
    pub fn clamp_selection(&mut self) {
        let len = self.items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.offset = self.offset.min(self.selected);
    }

    fn abort_load(&mut self) {
        if let Some(handle) = self.load_handle.take() {
            handle.abort();
        }
    }
}

// ============================================================================
// Filter Picker
// ============================================================================

/// Category/tag vocabulary, fetched on first use and then cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyState {
    Unloaded,
    Loading,
    Loaded(Vec<String>),
}

/// Open filter picker. Row 0 is always "Any".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub kind: Vocabulary,
    pub selected: usize,
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    /// A page request finished.
    ///
    /// `generation` is the one the request was issued under; responses for
    /// superseded generations are dropped by `Pagination::complete`.
    PageLoaded {
        screen: ScreenId,
        generation: u64,
        result: Result<Vec<NewsItem>, ApiError>,
    },
    /// A category or tag list finished loading.
    VocabularyLoaded {
        kind: Vocabulary,
        result: Result<Vec<String>, ApiError>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub client: NewsClient,

    /// Current theme variant (for cycling).
    pub theme_variant: ThemeVariant,
    /// Active style map for all UI rendering.
    pub theme: StyleMap,

    pub story: FeedScreen,
    pub list: FeedScreen,
    pub active: ScreenId,

    pub picker: Option<PickerState>,
    pub categories: VocabularyState,
    pub tags: VocabularyState,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Current frame of the loading spinner animation.
    pub spinner_frame: usize,

    /// Whether the help overlay is currently displayed.
    pub show_help: bool,
}

impl App {
    pub fn new(
        client: NewsClient,
        theme_variant: ThemeVariant,
        start: ScreenId,
        list_filter: FilterState,
    ) -> Self {
        Self {
            client,
            theme_variant,
            theme: StyleMap::from_palette(&theme_variant.palette()),
            story: FeedScreen::new(FilterState::default(), 1),
            list: FeedScreen::new(list_filter, 1),
            active: start,
            picker: None,
            categories: VocabularyState::Unloaded,
            tags: VocabularyState::Unloaded,
            status_message: None,
            needs_redraw: true,
            spinner_frame: 0,
            show_help: false,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme_variant = variant;
        self.theme = StyleMap::from_palette(&variant.palette());
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant, returning its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme_variant.next();
        self.set_theme(next);
        next.name()
    }

    pub fn screen(&self, id: ScreenId) -> &FeedScreen {
        match id {
            ScreenId::Story => &self.story,
            ScreenId::List => &self.list,
        }
    }

    pub fn screen_mut(&mut self, id: ScreenId) -> &mut FeedScreen {
        match id {
            ScreenId::Story => &mut self.story,
            ScreenId::List => &mut self.list,
        }
    }

    pub fn active_screen(&self) -> &FeedScreen {
        self.screen(self.active)
    }

    pub fn active_screen_mut(&mut self) -> &mut FeedScreen {
        self.screen_mut(self.active)
    }

    /// Select a tab. Selecting the tab that is already active scrolls it to
    /// the top; showing a tab for the first time issues its initial load.
    pub fn switch_to(&mut self, id: ScreenId) -> Option<PageRequest> {
        if self.active == id {
            self.active_screen_mut().scroll_to_top();
            return None;
        }
        tracing::debug!(screen = id.title(), "Switching screen");
        self.active = id;
        self.picker = None;
        self.active_screen_mut().mount()
    }

    /// Whether a spinner should be animating.
    pub fn is_busy(&self) -> bool {
        self.active_screen().pagination.is_fetching()
            || self
                .picker
                .as_ref()
                .is_some_and(|p| *self.vocabulary(p.kind) == VocabularyState::Loading)
    }

    /// Apply a finished page request to its screen.
    pub fn apply_page(
        &mut self,
        id: ScreenId,
        generation: u64,
        result: Result<Vec<NewsItem>, ApiError>,
    ) -> Completion {
        let screen = self.screen_mut(id);
        let completion = screen.pagination.complete(generation, result);
        match &completion {
            Completion::Stale => {}
            Completion::Replaced { .. } => {
                screen.load_handle = None;
                screen.scroll_to_top();
            }
            Completion::Appended { .. } => {
                screen.load_handle = None;
                screen.clamp_selection();
            }
            Completion::Failed { message } => {
                screen.load_handle = None;
                let msg = format!("Failed to load news: {}", message);
                self.set_status(msg);
            }
        }
        completion
    }

    // ------------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------------

    pub fn vocabulary(&self, kind: Vocabulary) -> &VocabularyState {
        match kind {
            Vocabulary::Categories => &self.categories,
            Vocabulary::Tags => &self.tags,
        }
    }

    fn vocabulary_mut(&mut self, kind: Vocabulary) -> &mut VocabularyState {
        match kind {
            Vocabulary::Categories => &mut self.categories,
            Vocabulary::Tags => &mut self.tags,
        }
    }

    fn current_filter_value(&self, kind: Vocabulary) -> Option<&str> {
        let filter = self.list.pagination.filter();
        match kind {
            Vocabulary::Categories => filter.category(),
            Vocabulary::Tags => filter.tag(),
        }
    }

    /// Open the picker for `kind` on the list screen.
    ///
    /// Returns `true` when the vocabulary still has to be fetched.
    pub fn open_picker(&mut self, kind: Vocabulary) -> bool {
        if self.active != ScreenId::List {
            self.set_status("Filters are available on the News Feed tab");
            return false;
        }

        let needs_fetch = *self.vocabulary(kind) == VocabularyState::Unloaded;
        if needs_fetch {
            *self.vocabulary_mut(kind) = VocabularyState::Loading;
        }
        let selected = self.preselect_row(kind);
        self.picker = Some(PickerState { kind, selected });
        needs_fetch
    }

    /// Row of the currently active value, 0 ("Any") when unset or unknown.
    fn preselect_row(&self, kind: Vocabulary) -> usize {
        let (Some(current), VocabularyState::Loaded(values)) =
            (self.current_filter_value(kind), self.vocabulary(kind))
        else {
            return 0;
        };
        values
            .iter()
            .position(|v| v == current)
            .map_or(0, |i| i + 1)
    }

    /// Number of rows in the open picker, including "Any".
    pub fn picker_len(&self) -> usize {
        match &self.picker {
            Some(picker) => match self.vocabulary(picker.kind) {
                VocabularyState::Loaded(values) => values.len() + 1,
                _ => 0,
            },
            None => 0,
        }
    }

    pub fn picker_down(&mut self) {
        let max = self.picker_len().saturating_sub(1);
        if let Some(picker) = self.picker.as_mut() {
            picker.selected = picker.selected.saturating_add(1).min(max);
        }
    }

    pub fn picker_up(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Apply the highlighted picker row as the new filter value.
    ///
    /// Does nothing while the vocabulary is still loading.
    pub fn picker_confirm(&mut self) -> Option<PageRequest> {
        let picker = self.picker.clone()?;
        let value = match self.vocabulary(picker.kind) {
            VocabularyState::Loaded(values) => match picker.selected {
                0 => None,
                i => values.get(i - 1).cloned(),
            },
            _ => return None,
        };
        self.picker = None;

        let list = &mut self.list;
        list.mounted = true;
        list.scroll_to_top();
        match picker.kind {
            Vocabulary::Categories => list.pagination.set_category(value),
            Vocabulary::Tags => list.pagination.set_tag(value),
        }
    }

    pub fn clear_filters(&mut self) -> Option<PageRequest> {
        if self.active != ScreenId::List {
            return None;
        }
        self.list.mounted = true;
        self.list.scroll_to_top();
        self.list.pagination.clear_filters()
    }

    /// Store a fetched vocabulary. A failure resets it so the next open
    /// retries.
    pub fn apply_vocabulary(&mut self, kind: Vocabulary, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(values) => {
                tracing::debug!(kind = ?kind, count = values.len(), "Vocabulary cached");
                *self.vocabulary_mut(kind) = VocabularyState::Loaded(values);
                if self.picker.as_ref().is_some_and(|p| p.kind == kind) {
                    let selected = self.preselect_row(kind);
                    if let Some(picker) = self.picker.as_mut() {
                        picker.selected = selected;
                    }
                }
            }
            Err(e) => {
                tracing::warn!(kind = ?kind, error = %e, "Failed to load vocabulary");
                *self.vocabulary_mut(kind) = VocabularyState::Unloaded;
                if self.picker.as_ref().is_some_and(|p| p.kind == kind) {
                    self.picker = None;
                }
                self.set_status(format!(
                    "Failed to load {} list: {}",
                    kind.label().to_lowercase(),
                    e
                ));
            }
        }
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

/// Abort in-flight requests so no task outlives the event loop.
impl Drop for App {
    fn drop(&mut self) {
        self.story.abort_load();
        self.list.abort_load();
    }
}
