//! The view-state store: period selection, notifications, modal and sidebar
//! visibility, insight expansion, and the locked/unlocked feature tier.
//!
//! The store is owned by the controller and mutated only through the
//! operations below. Every mutation emits a typed event to the registered
//! subscribers; nothing outside this crate touches the state directly.

use std::collections::HashMap;

use thiserror::Error;

use models::{default_insights, FeatureId, Insight, ModalId, Period, Tier};

pub type Result<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("Unknown period length: {0} days")]
    UnknownPeriod(u32),
}

/// Emitted after each state mutation, alongside the updated state.
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    PeriodChanged(Period),
    ModalOpened(ModalId),
    ModalClosed(ModalId),
    SidebarOpened,
    SidebarClosed,
    TierUnlocked,
    NotificationDismissed(String),
    CtaDismissed,
    InsightExpanded(String),
    InsightCollapsed(String),
    KeyboardFocusChanged(bool),
    TooltipShown(String),
    TooltipHidden,
}

/// What an Escape press ended up closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedOverlay {
    Modal(ModalId),
    Sidebar,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub period: Period,
    pub notifications: Vec<String>,
    pub open_modal: Option<ModalId>,
    pub sidebar_open: bool,
    pub features: HashMap<FeatureId, Tier>,
    pub insights: Vec<Insight>,
    pub expanded_insight: Option<String>,
    pub cta_dismissed: bool,
    pub keyboard_focus: bool,
    pub tooltip: Option<String>,
}

impl ViewState {
    fn new() -> Self {
        ViewState {
            period: Period::Month,
            notifications: vec!["low-balance".to_string()],
            open_modal: None,
            sidebar_open: false,
            features: FeatureId::ALL.iter().map(|f| (*f, Tier::Locked)).collect(),
            insights: default_insights(),
            expanded_insight: None,
            cta_dismissed: false,
            keyboard_focus: false,
            tooltip: None,
        }
    }

    /// Unlocked once every feature card has been flipped.
    pub fn tier(&self) -> Tier {
        if self.features.values().all(|t| *t == Tier::Unlocked) {
            Tier::Unlocked
        } else {
            Tier::Locked
        }
    }

    /// The overlay backdrop is shown whenever any modal is open.
    pub fn overlay_visible(&self) -> bool {
        self.open_modal.is_some()
    }

    /// The bell badge lights up while any notification is pending.
    pub fn notification_badge_active(&self) -> bool {
        !self.notifications.is_empty()
    }

    /// Insight cards currently shown: premium cards only after the unlock.
    pub fn visible_insights(&self) -> Vec<&Insight> {
        let unlocked = self.tier() == Tier::Unlocked;
        self.insights
            .iter()
            .filter(|i| !i.premium || unlocked)
            .collect()
    }
}

type Listener = Box<dyn FnMut(&StateEvent, &ViewState)>;

pub struct StateStore {
    state: ViewState,
    listeners: Vec<Listener>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore {
    pub fn new() -> Self {
        StateStore {
            state: ViewState::new(),
            listeners: Vec::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Registers a subscriber; it is called after every mutation with the
    /// event and the already-updated state.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&StateEvent, &ViewState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, event: StateEvent) {
        let state = &self.state;
        for listener in &mut self.listeners {
            listener(&event, state);
        }
    }

    /// Switches the chart period. Unknown day counts are rejected and the
    /// current selection stays active.
    pub fn select_period(&mut self, days: u32) -> Result<()> {
        let period = Period::from_days(days).ok_or(StateError::UnknownPeriod(days))?;
        self.state.period = period;
        self.emit(StateEvent::PeriodChanged(period));
        Ok(())
    }

    /// Opens a modal, closing whichever one was open. Idempotent.
    pub fn open_modal(&mut self, id: ModalId) {
        if self.state.open_modal == Some(id) {
            return;
        }
        if let Some(previous) = self.state.open_modal.take() {
            self.emit(StateEvent::ModalClosed(previous));
        }
        self.state.open_modal = Some(id);
        self.emit(StateEvent::ModalOpened(id));
    }

    /// Closes the open modal, if any. Idempotent.
    pub fn close_modal(&mut self) {
        if let Some(id) = self.state.open_modal.take() {
            self.emit(StateEvent::ModalClosed(id));
        }
    }

    pub fn toggle_sidebar(&mut self) {
        if self.state.sidebar_open {
            self.close_sidebar();
        } else {
            self.state.sidebar_open = true;
            self.emit(StateEvent::SidebarOpened);
        }
    }

    pub fn close_sidebar(&mut self) {
        if self.state.sidebar_open {
            self.state.sidebar_open = false;
            self.emit(StateEvent::SidebarClosed);
        }
    }

    /// One-way transition to the multi-bank tier. Flips every feature card;
    /// repeat calls do nothing and emit nothing.
    pub fn unlock_tier(&mut self) {
        if self.state.tier() == Tier::Unlocked {
            return;
        }
        for tier in self.state.features.values_mut() {
            *tier = Tier::Unlocked;
        }
        self.emit(StateEvent::TierUnlocked);
    }

    pub fn dismiss_notification(&mut self, id: &str) {
        let before = self.state.notifications.len();
        self.state.notifications.retain(|n| n != id);
        if self.state.notifications.len() != before {
            self.emit(StateEvent::NotificationDismissed(id.to_string()));
        }
    }

    /// One-way hide of the upgrade banner.
    pub fn dismiss_cta(&mut self) {
        if !self.state.cta_dismissed {
            self.state.cta_dismissed = true;
            self.emit(StateEvent::CtaDismissed);
        }
    }

    /// Expands the clicked insight card and collapses the rest; clicking an
    /// expanded card collapses it. Cards not currently visible are ignored.
    pub fn toggle_insight(&mut self, id: &str) {
        if !self.state.visible_insights().iter().any(|i| i.id == id) {
            return;
        }
        if self.state.expanded_insight.as_deref() == Some(id) {
            self.state.expanded_insight = None;
            self.emit(StateEvent::InsightCollapsed(id.to_string()));
            return;
        }
        if let Some(previous) = self.state.expanded_insight.take() {
            self.emit(StateEvent::InsightCollapsed(previous));
        }
        self.state.expanded_insight = Some(id.to_string());
        self.emit(StateEvent::InsightExpanded(id.to_string()));
    }

    /// Tab enables the visible-focus mode.
    pub fn set_keyboard_focus(&mut self) {
        if !self.state.keyboard_focus {
            self.state.keyboard_focus = true;
            self.emit(StateEvent::KeyboardFocusChanged(true));
        }
    }

    /// Any pointer click clears the visible-focus mode.
    pub fn pointer_clicked(&mut self) {
        if self.state.keyboard_focus {
            self.state.keyboard_focus = false;
            self.emit(StateEvent::KeyboardFocusChanged(false));
        }
    }

    pub fn show_tooltip(&mut self, text: &str) {
        self.state.tooltip = Some(text.to_string());
        self.emit(StateEvent::TooltipShown(text.to_string()));
    }

    pub fn hide_tooltip(&mut self) {
        if self.state.tooltip.take().is_some() {
            self.emit(StateEvent::TooltipHidden);
        }
    }

    /// Escape closes the topmost overlay: the open modal first, then the
    /// sidebar. Returns what was closed, if anything.
    pub fn handle_escape(&mut self) -> Option<ClosedOverlay> {
        if let Some(id) = self.state.open_modal {
            self.close_modal();
            return Some(ClosedOverlay::Modal(id));
        }
        if self.state.sidebar_open {
            self.close_sidebar();
            return Some(ClosedOverlay::Sidebar);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (StateStore, Rc<RefCell<Vec<StateEvent>>>) {
        let mut store = StateStore::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event, _state| sink.borrow_mut().push(event.clone()));
        (store, events)
    }

    #[test]
    fn test_select_period_valid() {
        let (mut store, events) = recording_store();
        store.select_period(7).unwrap();
        assert_eq!(store.state().period, Period::Week);
        assert_eq!(
            events.borrow().as_slice(),
            &[StateEvent::PeriodChanged(Period::Week)]
        );
    }

    #[test]
    fn test_select_period_unknown_leaves_state_unchanged() {
        let (mut store, events) = recording_store();
        let err = store.select_period(45).unwrap_err();
        assert_eq!(err, StateError::UnknownPeriod(45));
        assert_eq!(store.state().period, Period::Month);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_modal_open_is_exclusive_and_idempotent() {
        let (mut store, events) = recording_store();
        store.open_modal(ModalId::ConnectBanks);
        store.open_modal(ModalId::ConnectBanks);
        assert_eq!(store.state().open_modal, Some(ModalId::ConnectBanks));
        assert!(store.state().overlay_visible());

        store.open_modal(ModalId::AiChat);
        assert_eq!(store.state().open_modal, Some(ModalId::AiChat));
        assert_eq!(
            events.borrow().as_slice(),
            &[
                StateEvent::ModalOpened(ModalId::ConnectBanks),
                StateEvent::ModalClosed(ModalId::ConnectBanks),
                StateEvent::ModalOpened(ModalId::AiChat),
            ]
        );

        store.close_modal();
        store.close_modal();
        assert!(!store.state().overlay_visible());
    }

    #[test]
    fn test_unlock_tier_is_monotonic() {
        let (mut store, events) = recording_store();
        assert_eq!(store.state().tier(), Tier::Locked);

        store.unlock_tier();
        assert_eq!(store.state().tier(), Tier::Unlocked);
        assert!(store
            .state()
            .features
            .values()
            .all(|t| *t == Tier::Unlocked));

        // Repeat unlocks are silent no-ops.
        store.unlock_tier();
        let unlock_events = events
            .borrow()
            .iter()
            .filter(|e| **e == StateEvent::TierUnlocked)
            .count();
        assert_eq!(unlock_events, 1);
    }

    #[test]
    fn test_dismiss_notification() {
        let (mut store, events) = recording_store();
        assert!(store.state().notification_badge_active());

        store.dismiss_notification("low-balance");
        assert!(!store.state().notification_badge_active());

        // Unknown ids are ignored.
        store.dismiss_notification("nope");
        assert_eq!(
            events.borrow().as_slice(),
            &[StateEvent::NotificationDismissed("low-balance".to_string())]
        );
    }

    #[test]
    fn test_toggle_insight_expands_one_at_a_time() {
        let (mut store, _events) = recording_store();
        store.toggle_insight("low-balance");
        assert_eq!(store.state().expanded_insight.as_deref(), Some("low-balance"));

        store.toggle_insight("avg-balance");
        assert_eq!(store.state().expanded_insight.as_deref(), Some("avg-balance"));

        store.toggle_insight("avg-balance");
        assert!(store.state().expanded_insight.is_none());
    }

    #[test]
    fn test_premium_insights_hidden_until_unlock() {
        let (mut store, _events) = recording_store();
        assert_eq!(store.state().visible_insights().len(), 3);

        // Toggling a hidden premium card does nothing.
        store.toggle_insight("idle-cash");
        assert!(store.state().expanded_insight.is_none());

        store.unlock_tier();
        assert_eq!(store.state().visible_insights().len(), 5);
        store.toggle_insight("idle-cash");
        assert_eq!(store.state().expanded_insight.as_deref(), Some("idle-cash"));
    }

    #[test]
    fn test_escape_prefers_modal_over_sidebar() {
        let (mut store, _events) = recording_store();
        store.toggle_sidebar();
        store.open_modal(ModalId::Upgrade);

        assert_eq!(
            store.handle_escape(),
            Some(ClosedOverlay::Modal(ModalId::Upgrade))
        );
        assert!(store.state().sidebar_open);

        assert_eq!(store.handle_escape(), Some(ClosedOverlay::Sidebar));
        assert_eq!(store.handle_escape(), None);
    }

    #[test]
    fn test_keyboard_focus_cleared_by_pointer() {
        let (mut store, events) = recording_store();
        store.set_keyboard_focus();
        store.set_keyboard_focus();
        assert!(store.state().keyboard_focus);

        store.pointer_clicked();
        assert!(!store.state().keyboard_focus);
        assert_eq!(
            events.borrow().as_slice(),
            &[
                StateEvent::KeyboardFocusChanged(true),
                StateEvent::KeyboardFocusChanged(false),
            ]
        );
    }

    #[test]
    fn test_cta_dismiss_one_way() {
        let (mut store, events) = recording_store();
        store.dismiss_cta();
        store.dismiss_cta();
        assert!(store.state().cta_dismissed);
        assert_eq!(events.borrow().as_slice(), &[StateEvent::CtaDismissed]);
    }
}
