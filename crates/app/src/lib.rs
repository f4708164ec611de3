//! The dashboard controller: owns the state store, the scripted flows, and
//! the render surface, and turns state events into surface updates.
//!
//! Mutations go through the store, which queues typed events; the
//! controller drains the queue after every operation and reacts (rebinding
//! the chart, flipping feature badges, hiding the CTA). Nothing renders by
//! ambient mutation.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use chrono::Local;
use rand::rngs::StdRng;
use serde_json::json;
use tokio::sync::watch;
use tokio::time::Duration;

use animation::Tween;
use assistant::{Responder, Transcript};
use bank_connect::{ConnectionError, ConnectionFlow, Effect};
use chart_binding::{bind, format_currency, monthly_averages, summarize, ChartVariant};
use data_generator::{daily_series, pulse_series};
use models::{ChatMessage, ChatRole, DailySeries, DemoSettings, FeatureId, ModalId, Tier};
use view_state::{StateEvent, StateStore};

pub mod keyboard;
pub mod surface;

pub use keyboard::Key;
pub use surface::{ConsoleSurface, NullSurface, Surface};

const TOOLTIP_TEXT: &str = "Connect more banks for complete cash visibility";
const FREE_FEATURE_TOAST: &str = "This feature is available with your current plan!";

pub struct Controller<S: Surface> {
    settings: DemoSettings,
    store: StateStore,
    events: Rc<RefCell<VecDeque<StateEvent>>>,
    surface: S,
    responder: Responder,
    transcript: Transcript,
    flow: ConnectionFlow,
    rng: StdRng,
    displayed_balance: f64,
}

impl<S: Surface> Controller<S> {
    pub fn new(settings: DemoSettings, surface: S, rng: StdRng) -> Self {
        let mut store = StateStore::new();
        let events: Rc<RefCell<VecDeque<StateEvent>>> = Rc::new(RefCell::new(VecDeque::new()));
        let queue = Rc::clone(&events);
        store.subscribe(move |event, _state| queue.borrow_mut().push_back(event.clone()));

        let flow = ConnectionFlow::new(&settings.timings);
        let displayed_balance = settings.daily.base_value;

        let mut controller = Controller {
            settings,
            store,
            events,
            surface,
            responder: Responder::default(),
            transcript: Transcript::new(),
            flow,
            rng,
            displayed_balance,
        };
        controller.initial_render();
        controller
    }

    pub fn state(&self) -> &view_state::ViewState {
        self.store.state()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    fn initial_render(&mut self) {
        let badge = format!("{} Only", self.settings.home_bank);
        self.surface.set_filter_badge(&badge, false);
        let balance = format_currency(self.displayed_balance);
        self.surface.set_balance(&balance);
        self.surface
            .set_notification_badge(self.store.state().notification_badge_active());
        self.surface.set_cta_visible(true);
        for feature in FeatureId::ALL {
            self.surface.set_feature_tier(feature, Tier::Locked);
        }
        for insight in self.store.state().visible_insights() {
            let id = insight.id.clone();
            self.surface.set_insight_visible(&id, true);
        }
        self.rebind_charts();
    }

    /// Regenerates the Pulse series and fully replaces the bound chart.
    fn rebind_charts(&mut self) {
        let series = pulse_series(&self.settings, &mut self.rng);
        let config = bind(&series, ChartVariant::Full, &self.settings);
        self.surface.render_chart(&config);
        if self.store.state().open_modal == Some(ModalId::AiChat) {
            let mini = bind(&series, ChartVariant::Mini, &self.settings);
            self.surface.render_mini_chart(&mini);
        }
        self.surface
            .set_summary(&summarize(&series), &monthly_averages(&series, &self.settings));
    }

    fn render_mini_chart(&mut self) {
        let series = pulse_series(&self.settings, &mut self.rng);
        let mini = bind(&series, ChartVariant::Mini, &self.settings);
        self.surface.render_mini_chart(&mini);
    }

    fn drain_events(&mut self) {
        loop {
            let next = self.events.borrow_mut().pop_front();
            let Some(event) = next else { break };
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: StateEvent) {
        match event {
            StateEvent::PeriodChanged(period) => {
                logger::event("app", "period", json!({ "days": period.days() }));
                self.rebind_charts();
            }
            StateEvent::ModalOpened(id) => {
                self.surface.set_modal(Some(id));
                if id == ModalId::AiChat {
                    self.render_mini_chart();
                }
            }
            StateEvent::ModalClosed(_) => {
                let open = self.store.state().open_modal;
                self.surface.set_modal(open);
            }
            StateEvent::SidebarOpened => self.surface.set_sidebar(true),
            StateEvent::SidebarClosed => self.surface.set_sidebar(false),
            StateEvent::TierUnlocked => {
                logger::info("app", "multi-bank tier unlocked");
                self.surface.set_filter_badge("All Connected Banks", true);
                for feature in FeatureId::ALL {
                    self.surface.set_feature_tier(feature, Tier::Unlocked);
                }
                let premium: Vec<String> = self
                    .store
                    .state()
                    .insights
                    .iter()
                    .filter(|i| i.premium)
                    .map(|i| i.id.clone())
                    .collect();
                for id in premium {
                    self.surface.set_insight_visible(&id, true);
                }
                self.store.dismiss_cta();
                self.rebind_charts();
            }
            StateEvent::NotificationDismissed(_) => {
                self.surface
                    .set_notification_badge(self.store.state().notification_badge_active());
            }
            StateEvent::CtaDismissed => self.surface.set_cta_visible(false),
            StateEvent::InsightExpanded(id) => self.surface.set_insight_expanded(Some(&id)),
            StateEvent::InsightCollapsed(_) => {
                let expanded = self.store.state().expanded_insight.clone();
                self.surface.set_insight_expanded(expanded.as_deref());
            }
            StateEvent::KeyboardFocusChanged(on) => self.surface.set_focus_visible(on),
            StateEvent::TooltipShown(text) => self.surface.set_tooltip(Some(&text)),
            StateEvent::TooltipHidden => self.surface.set_tooltip(None),
        }
    }

    /// Switches the chart period. Unknown day counts are rejected and leave
    /// the current selection active.
    pub fn select_period(&mut self, days: u32) -> view_state::Result<()> {
        match self.store.select_period(days) {
            Ok(()) => {
                self.drain_events();
                Ok(())
            }
            Err(err) => {
                logger::event("app", "period rejected", json!({ "days": days }));
                Err(err)
            }
        }
    }

    /// The daily walk for the currently selected period, ending today.
    pub fn daily_view(&mut self) -> DailySeries {
        let today = Local::now().date_naive();
        daily_series(
            self.store.state().period,
            today,
            &self.settings.daily,
            &mut self.rng,
        )
    }

    pub fn open_connect_banks(&mut self) {
        self.store.open_modal(ModalId::ConnectBanks);
        self.drain_events();
    }

    pub fn open_ai_chat(&mut self) {
        self.store.open_modal(ModalId::AiChat);
        self.drain_events();
    }

    pub fn close_modal(&mut self) {
        self.store.close_modal();
        self.drain_events();
    }

    pub fn toggle_sidebar(&mut self) {
        self.store.toggle_sidebar();
        self.drain_events();
    }

    /// Locked cards open the upgrade modal with the feature's blurb; free
    /// cards just confirm they are included.
    pub fn feature_clicked(&mut self, feature: FeatureId) {
        let locked = self.store.state().features.get(&feature) == Some(&Tier::Locked);
        if locked {
            self.surface.set_upgrade_copy(feature.upgrade_blurb());
            self.store.open_modal(ModalId::Upgrade);
            self.drain_events();
        } else {
            self.surface
                .toast(FREE_FEATURE_TOAST, self.settings.timings.toast_ms);
        }
    }

    pub fn dismiss_cta(&mut self) {
        self.store.dismiss_cta();
        self.drain_events();
    }

    pub fn dismiss_notification(&mut self, id: &str) {
        self.store.dismiss_notification(id);
        self.drain_events();
    }

    pub fn toggle_insight(&mut self, id: &str) {
        self.store.toggle_insight(id);
        self.drain_events();
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.store.handle_escape();
                self.drain_events();
            }
            Key::Tab => {
                self.store.set_keyboard_focus();
                self.drain_events();
            }
            Key::Other => {}
        }
    }

    pub fn pointer_clicked(&mut self) {
        self.store.pointer_clicked();
        self.drain_events();
    }

    pub fn info_icon_hovered(&mut self) {
        self.store.show_tooltip(TOOLTIP_TEXT);
        self.drain_events();
    }

    pub fn info_icon_left(&mut self) {
        self.store.hide_tooltip();
        self.drain_events();
    }

    /// Runs the whole connection sequence for one bank and, on success,
    /// animates the balance up to the multi-bank total. Unknown banks are
    /// rejected; a second flow cannot start while one is running.
    pub async fn connect_bank(&mut self, name: &str) -> bank_connect::Result<bool> {
        if !self.settings.banks.iter().any(|b| b == name) {
            return Err(ConnectionError::BankUnavailable(name.to_string()));
        }

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let toast_ms = self.settings.timings.toast_ms;
        let finished = {
            let Controller {
                flow,
                store,
                surface,
                ..
            } = self;
            bank_connect::run(flow, name, &mut cancel_rx, |effect| match effect {
                Effect::ShowLoading(message) => surface.show_loading(message),
                Effect::HideLoading => surface.hide_loading(),
                Effect::Toast(message) => surface.toast(message, toast_ms),
                Effect::CloseActiveModal => {
                    // Rendered right away; the queued event re-renders the
                    // same state when the flow finishes.
                    store.close_modal();
                    surface.set_modal(None);
                }
                Effect::UnlockTier => store.unlock_tier(),
            })
            .await?
        };
        drop(cancel_tx);
        self.drain_events();

        if finished {
            self.animate_balance_to(self.settings.unlocked_balance).await;
        }
        Ok(finished)
    }

    /// Sends a chat prompt and waits out the scripted reply. Returns None
    /// for empty prompts and while a reply is already pending.
    pub async fn send_chat_message(&mut self, prompt: &str) -> Option<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() || self.transcript.is_pending() {
            return None;
        }

        self.surface.append_chat(&ChatMessage {
            role: ChatRole::User,
            text: prompt.to_string(),
        });
        self.surface.set_typing(true);

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let reply = {
            let Controller {
                responder,
                transcript,
                rng,
                settings,
                ..
            } = self;
            assistant::exchange(
                responder,
                transcript,
                prompt,
                &settings.timings,
                rng,
                &mut cancel_rx,
            )
            .await
        };
        drop(cancel_tx);

        self.surface.set_typing(false);
        if let Some(text) = &reply {
            self.surface.append_chat(&ChatMessage {
                role: ChatRole::Assistant,
                text: text.clone(),
            });
        }
        reply
    }

    async fn animate_balance_to(&mut self, target: f64) {
        let steps = self.settings.timings.animation_steps;
        let animation_ms = self.settings.timings.animation_ms;
        let tween = Tween::new(self.displayed_balance, target, steps);
        let step_delay = Duration::from_millis((animation_ms / steps.max(1) as u64).max(1));

        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        {
            let surface = &mut self.surface;
            animation::run(&tween, step_delay, &mut cancel_rx, |value| {
                surface.set_balance(&format_currency(value));
            })
            .await;
        }
        drop(cancel_tx);
        self.displayed_balance = target;
    }
}
