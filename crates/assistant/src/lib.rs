//! Scripted chat assistant: keyword rules over the prompt, canned replies,
//! and a simulated thinking delay. No inference happens anywhere.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

use models::{ChatMessage, ChatRole, Timings};

/// How a rule's keywords combine: every keyword, or at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchOperator {
    All,
    Any,
}

/// One canned-reply rule. Keywords are matched as case-insensitive
/// substrings of the prompt; the rule list is ordered and the first match
/// wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRule {
    pub name: String,
    pub keywords: Vec<String>,
    pub operator: MatchOperator,
    pub response: String,
}

impl ResponseRule {
    pub fn matches(&self, prompt: &str) -> bool {
        if self.keywords.is_empty() {
            return false; // No keywords means no match
        }
        let prompt = prompt.to_lowercase();
        match self.operator {
            MatchOperator::All => self
                .keywords
                .iter()
                .all(|k| prompt.contains(&k.to_lowercase())),
            MatchOperator::Any => self
                .keywords
                .iter()
                .any(|k| prompt.contains(&k.to_lowercase())),
        }
    }
}

/// The rule list plus the fallback pool used when nothing matches.
pub struct Responder {
    rules: Vec<ResponseRule>,
    defaults: Vec<String>,
}

impl Default for Responder {
    fn default() -> Self {
        Responder {
            rules: default_rules(),
            defaults: default_pool(),
        }
    }
}

impl Responder {
    pub fn new(rules: Vec<ResponseRule>, defaults: Vec<String>) -> Self {
        // An empty fallback pool would leave unmatched prompts unanswerable.
        let defaults = if defaults.is_empty() {
            default_pool()
        } else {
            defaults
        };
        Responder { rules, defaults }
    }

    /// First rule that matches the prompt, in list order.
    pub fn match_rule(&self, prompt: &str) -> Option<&ResponseRule> {
        self.rules.iter().find(|r| r.matches(prompt))
    }

    /// The canned reply for a prompt: the first matching rule's response,
    /// or a pseudo-random pick from the default pool.
    pub fn respond<R: Rng + ?Sized>(&self, prompt: &str, rng: &mut R) -> String {
        if let Some(rule) = self.match_rule(prompt) {
            return rule.response.clone();
        }
        let idx = rng.gen_range(0..self.defaults.len());
        self.defaults[idx].clone()
    }

    pub fn default_pool(&self) -> &[String] {
        &self.defaults
    }
}

/// Append-only chat history plus the "assistant is typing" flag.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn push_user(&mut self, text: &str) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.to_string(),
        });
    }

    pub fn push_assistant(&mut self, text: &str) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            text: text.to_string(),
        });
    }

    fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }
}

/// Runs one full exchange: append the user prompt, think for the
/// configured delay, append the reply. Returns the reply, or None if the
/// flow was cancelled mid-delay (the user prompt stays in the transcript;
/// the reply is never appended).
pub async fn exchange<R: Rng + ?Sized>(
    responder: &Responder,
    transcript: &mut Transcript,
    prompt: &str,
    timings: &Timings,
    rng: &mut R,
    cancel: &mut watch::Receiver<bool>,
) -> Option<String> {
    transcript.push_user(prompt);
    transcript.set_pending(true);

    let delay = Duration::from_millis(reply_delay_ms(timings, rng));
    tokio::select! {
        _ = sleep(delay) => {}
        _ = cancel.changed() => {
            transcript.set_pending(false);
            return None;
        }
    }

    let reply = responder.respond(prompt, rng);
    let rule = responder
        .match_rule(prompt)
        .map(|r| r.name.as_str())
        .unwrap_or("default-pool");
    logger::event("assistant", "reply", json!({ "rule": rule }));

    transcript.push_assistant(&reply);
    transcript.set_pending(false);
    Some(reply)
}

/// Base delay plus up to `chat_jitter_ms` of random padding.
fn reply_delay_ms<R: Rng + ?Sized>(timings: &Timings, rng: &mut R) -> u64 {
    timings.chat_base_ms + (rng.gen::<f64>() * timings.chat_jitter_ms as f64) as u64
}

/// The built-in rule set, in priority order.
pub fn default_rules() -> Vec<ResponseRule> {
    vec![
        ResponseRule {
            name: "september-expense-spike".to_string(),
            keywords: vec!["expense".to_string(), "september".to_string()],
            operator: MatchOperator::All,
            response: "I can see that September had a significant expense spike to $121K, \
                       which is much higher than your average of $71K. This appears to be \
                       driven by one-time costs. Would you like me to analyze the specific \
                       categories driving this increase?"
                .to_string(),
        },
        ResponseRule {
            name: "cash-flow-trend".to_string(),
            keywords: vec!["cash flow".to_string(), "positive".to_string()],
            operator: MatchOperator::Any,
            response: "Based on your current data, your cash flow shows some volatility but \
                       maintains an overall positive trajectory. Your ending cash position of \
                       $74.7K is lower than the beginning period, primarily due to the \
                       September expense spike. I'd recommend focusing on expense management \
                       in Q4."
                .to_string(),
        },
        ResponseRule {
            name: "expense-reduction".to_string(),
            keywords: vec!["reduce".to_string(), "expense".to_string()],
            operator: MatchOperator::All,
            response: "Great question! If you reduce expenses by 15%, that would save \
                       approximately $10.7K monthly based on your average. This could improve \
                       your ending cash position from $74.7K to around $85K, providing a much \
                       healthier buffer for operations."
                .to_string(),
        },
        ResponseRule {
            name: "forecast".to_string(),
            keywords: vec!["forecast".to_string(), "predict".to_string()],
            operator: MatchOperator::Any,
            response: "Based on your historical patterns, I predict your cash flow will \
                       stabilize around $70-80K monthly if you maintain current income levels \
                       and control the expense volatility we saw in September. Your PNC \
                       projections show a conservative outlook that aligns with this analysis."
                .to_string(),
        },
        ResponseRule {
            name: "income-consistency".to_string(),
            keywords: vec!["income".to_string()],
            operator: MatchOperator::All,
            response: "Your income shows good consistency, averaging $70.2K monthly with a \
                       range of $40K-$79K. The dip in October appears to be seasonal, but your \
                       core business income remains stable. I'd suggest exploring ways to \
                       boost the lower months."
                .to_string(),
        },
    ]
}

/// Fallback replies when no rule matches.
pub fn default_pool() -> Vec<String> {
    vec![
        "That's an interesting question about your cash flow data. Based on the chart, I can \
         see several trends that might be relevant. Could you be more specific about which \
         aspect you'd like me to analyze?"
            .to_string(),
        "Looking at your financial data, I notice some patterns in your cash flow. What \
         specific insights are you looking for to help with your business decisions?"
            .to_string(),
        "Your cash flow data shows both opportunities and areas for attention. I'd be happy \
         to dive deeper into any specific metrics or time periods you're concerned about."
            .to_string(),
    ]
}
