use serde::{Deserialize, Serialize};

// Period selection

/// Time window shown on the cash-flow chart. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    Week,
    Month,
    Quarter,
    Year,
}

/// How point labels are rendered for a given period length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Short weekday name ("Mon")
    Weekday,
    /// Month and day ("Sep 14")
    MonthDay,
    /// Month name only ("Sep")
    MonthOnly,
}

impl Period {
    /// All selectable periods, in display order.
    pub const ALL: [Period; 4] = [Period::Week, Period::Month, Period::Quarter, Period::Year];

    /// Maps a pill's day count to a period. Unknown counts are rejected by the caller.
    pub fn from_days(days: u32) -> Option<Period> {
        match days {
            7 => Some(Period::Week),
            30 => Some(Period::Month),
            90 => Some(Period::Quarter),
            365 => Some(Period::Year),
            _ => None,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
            Period::Quarter => 90,
            Period::Year => 365,
        }
    }

    pub fn label_style(&self) -> LabelStyle {
        match self.days() {
            0..=7 => LabelStyle::Weekday,
            8..=30 => LabelStyle::MonthDay,
            _ => LabelStyle::MonthOnly,
        }
    }
}

// Series models

/// One month of the Pulse series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashPoint {
    pub label: String,
    pub income: f64,
    pub expense: f64,
    pub cash_on_hand: f64,
    /// Present only for the trailing projected months.
    pub projection: Option<f64>,
}

/// The monthly income/expense/cash dataset behind the main chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashSeries {
    pub starting_cash: f64,
    pub points: Vec<CashPoint>,
}

impl CashSeries {
    pub fn total_income(&self) -> f64 {
        self.points.iter().map(|p| p.income).sum()
    }

    pub fn total_expenses(&self) -> f64 {
        self.points.iter().map(|p| p.expense).sum()
    }

    pub fn beginning_cash(&self) -> f64 {
        self.starting_cash
    }

    pub fn ending_cash(&self) -> f64 {
        self.points.last().map(|p| p.cash_on_hand).unwrap_or(self.starting_cash)
    }

    pub fn average_income(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.total_income() / self.points.len() as f64
    }

    pub fn average_expenses(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.total_expenses() / self.points.len() as f64
    }
}

/// One point of the daily balance walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySeries {
    pub period: Period,
    pub points: Vec<DailyPoint>,
}

// Feature cards

/// Locked/unlocked status of a premium feature card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Locked,
    Unlocked,
}

/// The premium feature cards gated behind the multi-bank connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureId {
    RealTimeBalance,
    AiForecasting,
    FraudProtection,
    InvoiceAutomation,
    ExpenseAnalytics,
}

impl FeatureId {
    pub const ALL: [FeatureId; 5] = [
        FeatureId::RealTimeBalance,
        FeatureId::AiForecasting,
        FeatureId::FraudProtection,
        FeatureId::InvoiceAutomation,
        FeatureId::ExpenseAnalytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::RealTimeBalance => "real-time-balance",
            FeatureId::AiForecasting => "ai-forecasting",
            FeatureId::FraudProtection => "fraud-protection",
            FeatureId::InvoiceAutomation => "invoice-automation",
            FeatureId::ExpenseAnalytics => "expense-analytics",
        }
    }

    /// Copy shown in the upgrade modal when the locked card is clicked.
    pub fn upgrade_blurb(&self) -> &'static str {
        match self {
            FeatureId::RealTimeBalance => {
                "Get real-time balance visibility across all your business accounts."
            }
            FeatureId::AiForecasting => {
                "Unlock AI-powered cash flow forecasting with 95% accuracy."
            }
            FeatureId::FraudProtection => {
                "Enable advanced fraud detection across all connected accounts."
            }
            FeatureId::InvoiceAutomation => {
                "Automate your invoicing and receivables management."
            }
            FeatureId::ExpenseAnalytics => {
                "Get detailed expense analytics and tax-ready reports."
            }
        }
    }
}

// Modals

/// Identifier of the single modal that may be open at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalId {
    ConnectBanks,
    Upgrade,
    AiChat,
}

// Chat models

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

// Insight cards

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    pub text: String,
    /// Hidden until the tier is unlocked.
    #[serde(default)]
    pub premium: bool,
}

/// The insight panel seeded on load: three base cards plus the
/// hyper-personalized cards revealed after the multi-bank unlock.
pub fn default_insights() -> Vec<Insight> {
    vec![
        Insight {
            id: "low-balance".to_string(),
            text: "Low balance detected - Consider moving $5K from savings".to_string(),
            premium: false,
        },
        Insight {
            id: "avg-balance".to_string(),
            text: "Your average daily balance is 15% higher than last month".to_string(),
            premium: false,
        },
        Insight {
            id: "upcoming-payments".to_string(),
            text: "3 upcoming payments totaling $12,500 in next 7 days".to_string(),
            premium: false,
        },
        Insight {
            id: "idle-cash".to_string(),
            text: "Idle cash across connected banks could earn $410/month in a sweep account"
                .to_string(),
            premium: true,
        },
        Insight {
            id: "duplicate-subscriptions".to_string(),
            text: "2 duplicate software subscriptions found across your connected accounts"
                .to_string(),
            premium: true,
        },
    ]
}

// Demo settings

/// Delays for the scripted flows, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub connect_ms: u64,
    pub reveal_ms: u64,
    pub fade_ms: u64,
    pub toast_ms: u64,
    pub chat_base_ms: u64,
    pub chat_jitter_ms: u64,
    pub animation_ms: u64,
    pub animation_steps: u32,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            connect_ms: 2000,
            reveal_ms: 3000,
            fade_ms: 1000,
            toast_ms: 3000,
            chat_base_ms: 1500,
            chat_jitter_ms: 1000,
            animation_ms: 1000,
            animation_steps: 60,
        }
    }
}

/// Parameters of the daily random-walk generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyParams {
    pub base_value: f64,
    pub volatility: f64,
    /// Damping applied to Saturday/Sunday moves.
    pub weekend_damping: f64,
    /// Flat boost added to the most recent fraction of the window.
    pub trend_boost: f64,
    /// Fraction of the window (from the end) that receives the boost.
    pub trend_window: f64,
}

impl Default for DailyParams {
    fn default() -> Self {
        DailyParams {
            base_value: 42350.0,
            volatility: 5000.0,
            weekend_damping: 0.7,
            trend_boost: 1000.0,
            trend_window: 0.3,
        }
    }
}

/// Everything the demo hardcodes, overridable from `demo_settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub settings_version: u32,
    /// Cash position before the first Pulse month.
    pub starting_cash: f64,
    /// Balance shown after the multi-bank unlock.
    pub unlocked_balance: f64,
    pub average_cash_start: f64,
    pub average_cash_end: f64,
    /// The bank every figure comes from before the unlock.
    pub home_bank: String,
    /// Banks offered in the connect modal.
    pub banks: Vec<String>,
    pub timings: Timings,
    pub daily: DailyParams,
}

impl Default for DemoSettings {
    fn default() -> Self {
        DemoSettings {
            settings_version: 1,
            starting_cash: 84849.0,
            unlocked_balance: 87650.0,
            average_cash_start: 104084.0,
            average_cash_end: 103068.0,
            home_bank: "PNC Bank".to_string(),
            banks: vec![
                "Chase".to_string(),
                "Bank of America".to_string(),
                "Wells Fargo".to_string(),
                "Capital One".to_string(),
            ],
            timings: Timings::default(),
            daily: DailyParams::default(),
        }
    }
}
