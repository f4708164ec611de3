//! The presentation seam. Everything the dashboard shows goes through this
//! trait; rendering targets that do not exist are simply ignored, so a
//! missing widget is never fatal.

use serde_json::json;

use chart_binding::{ChartConfig, MonthlyAverages, SummaryValues};
use models::{ChatMessage, FeatureId, ModalId, Tier};

pub trait Surface {
    fn render_chart(&mut self, config: &ChartConfig);
    fn render_mini_chart(&mut self, config: &ChartConfig);
    fn set_summary(&mut self, summary: &SummaryValues, averages: &MonthlyAverages);
    /// Already-formatted balance text, e.g. `$87,650`.
    fn set_balance(&mut self, formatted: &str);
    fn set_filter_badge(&mut self, label: &str, multi_bank: bool);
    fn set_modal(&mut self, modal: Option<ModalId>);
    fn set_sidebar(&mut self, open: bool);
    /// Body copy of the upgrade modal for the clicked feature.
    fn set_upgrade_copy(&mut self, text: &str);
    fn show_loading(&mut self, message: &str);
    fn hide_loading(&mut self);
    /// Transient success message; the surface owns its expiry.
    fn toast(&mut self, message: &str, duration_ms: u64);
    fn set_feature_tier(&mut self, feature: FeatureId, tier: Tier);
    fn set_insight_visible(&mut self, id: &str, visible: bool);
    fn set_insight_expanded(&mut self, id: Option<&str>);
    fn set_cta_visible(&mut self, visible: bool);
    fn append_chat(&mut self, message: &ChatMessage);
    fn set_typing(&mut self, typing: bool);
    fn set_tooltip(&mut self, text: Option<&str>);
    fn set_notification_badge(&mut self, active: bool);
    fn set_focus_visible(&mut self, on: bool);
}

/// Renders nothing. Used when no presentation layer is attached.
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn render_chart(&mut self, _config: &ChartConfig) {}
    fn render_mini_chart(&mut self, _config: &ChartConfig) {}
    fn set_summary(&mut self, _summary: &SummaryValues, _averages: &MonthlyAverages) {}
    fn set_balance(&mut self, _formatted: &str) {}
    fn set_filter_badge(&mut self, _label: &str, _multi_bank: bool) {}
    fn set_modal(&mut self, _modal: Option<ModalId>) {}
    fn set_sidebar(&mut self, _open: bool) {}
    fn set_upgrade_copy(&mut self, _text: &str) {}
    fn show_loading(&mut self, _message: &str) {}
    fn hide_loading(&mut self) {}
    fn toast(&mut self, _message: &str, _duration_ms: u64) {}
    fn set_feature_tier(&mut self, _feature: FeatureId, _tier: Tier) {}
    fn set_insight_visible(&mut self, _id: &str, _visible: bool) {}
    fn set_insight_expanded(&mut self, _id: Option<&str>) {}
    fn set_cta_visible(&mut self, _visible: bool) {}
    fn append_chat(&mut self, _message: &ChatMessage) {}
    fn set_typing(&mut self, _typing: bool) {}
    fn set_tooltip(&mut self, _text: Option<&str>) {}
    fn set_notification_badge(&mut self, _active: bool) {}
    fn set_focus_visible(&mut self, _on: bool) {}
}

/// Renders every update as a structured log line. This is what the demo
/// binary attaches so a scripted session is fully visible on stderr.
#[derive(Debug, Default)]
pub struct ConsoleSurface;

impl Surface for ConsoleSurface {
    fn render_chart(&mut self, config: &ChartConfig) {
        logger::event(
            "surface",
            "chart",
            json!({
                "labels": config.labels.len(),
                "datasets": config.datasets.iter().map(|d| d.label.clone()).collect::<Vec<_>>(),
                "primary_max": config.axes.primary_max,
            }),
        );
    }

    fn render_mini_chart(&mut self, config: &ChartConfig) {
        logger::event(
            "surface",
            "mini-chart",
            json!({ "datasets": config.datasets.len() }),
        );
    }

    fn set_summary(&mut self, summary: &SummaryValues, averages: &MonthlyAverages) {
        logger::event(
            "surface",
            "summary",
            json!({
                "beginning_cash": summary.beginning_cash,
                "total_income": summary.total_income,
                "total_expenses": summary.total_expenses,
                "ending_cash": summary.ending_cash,
                "avg_income": averages.avg_income,
                "avg_expenses": averages.avg_expenses,
            }),
        );
    }

    fn set_balance(&mut self, formatted: &str) {
        logger::event("surface", "balance", json!({ "value": formatted }));
    }

    fn set_filter_badge(&mut self, label: &str, multi_bank: bool) {
        logger::event(
            "surface",
            "filter-badge",
            json!({ "label": label, "multi_bank": multi_bank }),
        );
    }

    fn set_modal(&mut self, modal: Option<ModalId>) {
        logger::event("surface", "modal", json!({ "open": format!("{:?}", modal) }));
    }

    fn set_sidebar(&mut self, open: bool) {
        logger::event("surface", "sidebar", json!({ "open": open }));
    }

    fn set_upgrade_copy(&mut self, text: &str) {
        logger::event("surface", "upgrade-copy", json!({ "text": text }));
    }

    fn show_loading(&mut self, message: &str) {
        logger::event("surface", "loading", json!({ "message": message }));
    }

    fn hide_loading(&mut self) {
        logger::info("surface", "loading hidden");
    }

    fn toast(&mut self, message: &str, duration_ms: u64) {
        logger::event(
            "surface",
            "toast",
            json!({ "message": message, "duration_ms": duration_ms }),
        );
    }

    fn set_feature_tier(&mut self, feature: FeatureId, tier: Tier) {
        logger::event(
            "surface",
            "feature",
            json!({ "feature": feature.as_str(), "tier": format!("{:?}", tier) }),
        );
    }

    fn set_insight_visible(&mut self, id: &str, visible: bool) {
        logger::event(
            "surface",
            "insight",
            json!({ "id": id, "visible": visible }),
        );
    }

    fn set_insight_expanded(&mut self, id: Option<&str>) {
        logger::event("surface", "insight-expanded", json!({ "id": id }));
    }

    fn set_cta_visible(&mut self, visible: bool) {
        logger::event("surface", "cta", json!({ "visible": visible }));
    }

    fn append_chat(&mut self, message: &ChatMessage) {
        logger::event(
            "surface",
            "chat",
            json!({ "role": format!("{:?}", message.role), "text": message.text }),
        );
    }

    fn set_typing(&mut self, typing: bool) {
        logger::event("surface", "typing", json!({ "typing": typing }));
    }

    fn set_tooltip(&mut self, text: Option<&str>) {
        logger::event("surface", "tooltip", json!({ "text": text }));
    }

    fn set_notification_badge(&mut self, active: bool) {
        logger::event("surface", "notification-badge", json!({ "active": active }));
    }

    fn set_focus_visible(&mut self, on: bool) {
        logger::event("surface", "focus-visible", json!({ "on": on }));
    }
}
