// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AI activity generation client.
//!
//! Handles:
//! - Filter validation (invalid enum values never reach the gateway)
//! - Sanitizing the recent-titles history
//! - Prompt construction
//! - The chat-completions call and status mapping
//! - Extracting and normalizing the activity from the model's reply

use crate::models::{
    activity::GENERATED_ID_PREFIX, Activity, AgeGroup, Duration, FilterSpec, InvalidFilter,
    Location, Materials, RawFilters,
};
use crate::time_utils::unix_millis_now;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// At most this many recent titles are accepted from a request.
pub const MAX_RECENT_ACTIVITIES: usize = 10;
/// Recent titles are cut to this many characters.
pub const MAX_ACTIVITY_TITLE_LENGTH: usize = 100;
/// Only the newest few titles are quoted in the prompt.
const AVOID_TITLES_IN_PROMPT: usize = 3;
/// Length of the random part of a generated id.
const ID_SUFFIX_LENGTH: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

const SYSTEM_PROMPT: &str = r#"You are a creative activity generator for the "Activity Jar" app. You create fun, actionable activities for kids that parents can do with them.

ALWAYS respond with a valid JSON object in this exact format:
{
  "title": "Short catchy title (3-5 words)",
  "description": "One or two sentences describing the activity with enthusiasm. Be specific and actionable!",
  "emoji": "A single relevant emoji",
  "duration": "5min" or "15min" or "30min",
  "materials": "none" or "household" or "craft"
}

Guidelines:
- Activities should be safe, educational, and FUN
- Be creative and unique - don't repeat common activities
- Match the activity to the filters provided
- Use engaging, playful language
- Keep descriptions under 150 characters"#;

/// Errors surfaced by the generation client. Each kind is distinct so the
/// UI can show different guidance.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Invalid filter values: {0}")]
    InvalidRequest(#[from] InvalidFilter),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI credits exhausted. Please add credits to continue.")]
    QuotaExhausted,

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Could not parse activity from response: {0}")]
    ParseError(String),
}

/// Body of a generation request.
///
/// Both fields are kept as raw JSON. A `filters` value that is not an object
/// means no filters, and a `recentActivities` value that is not an array
/// means no history, so a malformed history never fails the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub filters: Option<serde_json::Value>,
    /// Titles shown recently. Non-string entries are ignored.
    #[serde(default)]
    pub recent_activities: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn new(filters: FilterSpec, recent_titles: &[String]) -> Self {
        let mut request = Self {
            filters: Some(RawFilters::from(filters).to_json()),
            recent_activities: None,
        };
        request.set_recent_titles(recent_titles.to_vec());
        request
    }

    /// Whether the body carries any recent-activity entries.
    pub fn has_recent_activities(&self) -> bool {
        !self.recent_entries().is_empty()
    }

    pub fn set_recent_titles(&mut self, titles: Vec<String>) {
        self.recent_activities = Some(serde_json::Value::Array(
            titles.into_iter().map(serde_json::Value::String).collect(),
        ));
    }

    fn recent_entries(&self) -> &[serde_json::Value] {
        match &self.recent_activities {
            Some(serde_json::Value::Array(entries)) => entries,
            _ => &[],
        }
    }

    /// Validate filters and sanitize titles. No network access.
    pub fn prepare(&self) -> Result<PreparedRequest, GenerationError> {
        let filters = match &self.filters {
            Some(raw) => RawFilters::from_json(raw).validate()?,
            None => FilterSpec::default(),
        };
        let recent_titles = sanitize_recent_titles(self.recent_entries());
        Ok(PreparedRequest {
            filters,
            recent_titles,
        })
    }
}

/// A validated request, ready to be turned into prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub filters: FilterSpec,
    pub recent_titles: Vec<String>,
}

impl PreparedRequest {
    pub fn system_prompt(&self) -> &'static str {
        SYSTEM_PROMPT
    }

    pub fn user_prompt(&self) -> String {
        let constraints = constraint_context(&self.filters);
        let constraints_line = if constraints.is_empty() {
            "No specific constraints.".to_string()
        } else {
            format!("Constraints: {}", constraints)
        };

        let avoid_line = if self.recent_titles.is_empty() {
            String::new()
        } else {
            let titles: Vec<&str> = self
                .recent_titles
                .iter()
                .take(AVOID_TITLES_IN_PROMPT)
                .map(String::as_str)
                .collect();
            format!("Avoid activities similar to: {}.", titles.join(", "))
        };

        format!(
            "Generate a unique, creative activity for kids.\n{}\n{}\n\nRemember: Respond ONLY with the JSON object, nothing else.",
            constraints_line, avoid_line
        )
    }
}

/// Keep the first `MAX_RECENT_ACTIVITIES` entries, drop non-strings, cut each
/// title and strip characters that could be used to inject markup or JSON.
pub fn sanitize_recent_titles(raw: &[serde_json::Value]) -> Vec<String> {
    raw.iter()
        .take(MAX_RECENT_ACTIVITIES)
        .filter_map(|v| v.as_str())
        .map(|title| {
            title
                .chars()
                .take(MAX_ACTIVITY_TITLE_LENGTH)
                .filter(|c| !matches!(c, '<' | '>' | '{' | '}'))
                .collect()
        })
        .collect()
}

/// Human-readable phrases for the constraints that are set.
fn constraint_context(filters: &FilterSpec) -> String {
    let mut context = String::new();
    if let Some(age) = filters.age_group {
        context.push_str(&format!("Age group: {} years old. ", age));
    }
    if let Some(location) = filters.location {
        context.push_str(&format!("Location: {}. ", location));
    }
    if let Some(duration) = filters.duration {
        context.push_str(&format!("Time available: {}. ", duration));
    }
    if let Some(materials) = filters.materials {
        context.push_str(&format!("Materials: {}. ", materials.describe()));
    }
    context
}

/// Find the first balanced `{...}` block in `text`.
///
/// Scans from the first `{`, counting depth. Braces inside JSON string
/// literals are skipped, honoring backslash escapes. Returns `None` if there
/// is no `{` or the block never closes.
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Fields the model is asked to produce. Enum fields are checked by serde.
#[derive(Debug, Deserialize)]
struct GeneratedActivity {
    title: String,
    description: String,
    emoji: String,
    duration: Duration,
    materials: Materials,
}

/// Turn raw model output into an activity for `filters`.
pub fn parse_generated_activity(
    content: &str,
    filters: &FilterSpec,
    id: String,
) -> Result<Activity, GenerationError> {
    let block = extract_json_block(content)
        .ok_or_else(|| GenerationError::ParseError("no JSON object in reply".to_string()))?;

    let generated: GeneratedActivity =
        serde_json::from_str(block).map_err(|e| GenerationError::ParseError(e.to_string()))?;

    let title = generated.title.trim();
    if title.is_empty() {
        return Err(GenerationError::ParseError("empty title".to_string()));
    }

    // "All ages" but "indoor only" when unset; kept for compatibility with
    // existing clients.
    let age_groups = match filters.age_group {
        Some(age) => vec![age],
        None => AgeGroup::ALL.to_vec(),
    };
    let locations = match filters.location {
        Some(location) => vec![location],
        None => vec![Location::Indoor],
    };

    Ok(Activity {
        id,
        title: title.to_string(),
        description: generated.description.trim().to_string(),
        age_groups,
        locations,
        duration: generated.duration,
        materials: generated.materials,
        emoji: generated.emoji.trim().to_string(),
    })
}

/// `ai-<unix millis>-<random base-36 suffix>`.
pub fn generate_activity_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}-{}", GENERATED_ID_PREFIX, unix_millis_now(), suffix)
}

/// Rolling history of generated titles, newest first.
#[derive(Debug, Clone, Default)]
pub struct RecentTitles {
    titles: VecDeque<String>,
}

impl RecentTitles {
    pub const CAPACITY: usize = 5;

    pub fn push(&mut self, title: impl Into<String>) {
        self.titles.push_front(title.into());
        self.titles.truncate(Self::CAPACITY);
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.titles.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GenerationClient - chat-completions gateway
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatReply>,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for the AI gateway. One HTTP request per `generate` call, no retries.
#[derive(Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl GenerationClient {
    /// Create a client; `timeout` bounds each request end to end.
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: std::time::Duration,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerationError::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model,
        })
    }

    /// Generate one activity.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Activity, GenerationError> {
        let prepared = request.prepare().inspect_err(|e| {
            tracing::info!(error = %e, "Rejected generation request");
        })?;
        self.generate_prepared(&prepared).await
    }

    /// Generate from an already validated request.
    pub async fn generate_prepared(
        &self,
        prepared: &PreparedRequest,
    ) -> Result<Activity, GenerationError> {
        let user_prompt = prepared.user_prompt();
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prepared.system_prompt(),
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
        };

        tracing::debug!(
            filters = prepared.filters.active_count(),
            recent = prepared.recent_titles.len(),
            "Requesting generated activity"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::BackendUnavailable(e.to_string()))?;

        let content = self.check_response(response).await?;
        let id = generate_activity_id(&mut rand::thread_rng());
        let activity = parse_generated_activity(&content, &prepared.filters, id)?;

        tracing::info!(id = %activity.id, title = %activity.title, "Generated activity");
        Ok(activity)
    }

    /// Map the gateway status and pull out the reply text.
    async fn check_response(&self, response: reqwest::Response) -> Result<String, GenerationError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("AI gateway rate limit hit (429)");
                return Err(GenerationError::RateLimited);
            }

            if status.as_u16() == 402 {
                tracing::warn!("AI gateway credits exhausted (402)");
                return Err(GenerationError::QuotaExhausted);
            }

            tracing::error!(status = %status, body = %body, "AI gateway error");
            return Err(GenerationError::BackendUnavailable(format!(
                "HTTP {}",
                status
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::BackendUnavailable(e.to_string()))?;

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::ParseError(format!("JSON parse error: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| GenerationError::ParseError("No content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn prepared(filters: FilterSpec, recent: &[&str]) -> PreparedRequest {
        PreparedRequest {
            filters,
            recent_titles: recent.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_prompt_without_constraints() {
        let prompt = prepared(FilterSpec::default(), &[]).user_prompt();
        assert!(prompt.contains("No specific constraints."));
        assert!(!prompt.contains("Avoid activities"));
    }

    #[test]
    fn test_prompt_lists_only_set_constraints() {
        let filters = FilterSpec {
            age_group: Some(AgeGroup::Ages5To7),
            materials: Some(Materials::Household),
            ..Default::default()
        };
        let prompt = prepared(filters, &[]).user_prompt();
        assert!(prompt
            .contains("Constraints: Age group: 5-7 years old. Materials: common household items."));
        assert!(!prompt.contains("Location:"));
        assert!(!prompt.contains("Time available:"));
    }

    #[test]
    fn test_prompt_avoids_three_newest_titles() {
        let prompt = prepared(
            FilterSpec::default(),
            &["Sock Puppets", "Bug Safari", "Cloud Stories", "Shadow Tag"],
        )
        .user_prompt();
        assert!(prompt.contains("Avoid activities similar to: Sock Puppets, Bug Safari, Cloud Stories."));
        assert!(!prompt.contains("Shadow Tag"));
    }

    #[test]
    fn test_sanitize_recent_titles() {
        let long = "x".repeat(150);
        let raw = vec![
            json!("<b>Fort</b>"),
            json!(42),
            json!("{inject}"),
            json!(long),
        ];
        let titles = sanitize_recent_titles(&raw);
        assert_eq!(titles[0], "bFort/b");
        assert_eq!(titles[1], "inject");
        assert_eq!(titles[2].len(), MAX_ACTIVITY_TITLE_LENGTH);
        assert_eq!(titles.len(), 3);
    }

    #[test]
    fn test_sanitize_takes_first_ten_before_filtering() {
        let mut raw: Vec<serde_json::Value> = (0..9).map(|_| json!(1)).collect();
        raw.push(json!("kept"));
        raw.push(json!("dropped"));
        assert_eq!(sanitize_recent_titles(&raw), vec!["kept".to_string()]);
    }

    #[test]
    fn test_extract_json_block_with_surrounding_text() {
        let text = "Sure! Here you go:\n```json\n{\"title\": \"A\", \"nested\": {\"x\": 1}}\n```\nEnjoy {not this}";
        assert_eq!(
            extract_json_block(text),
            Some("{\"title\": \"A\", \"nested\": {\"x\": 1}}")
        );
    }

    #[test]
    fn test_extract_json_block_ignores_braces_in_strings() {
        let text = r#"{"title": "Curly } brace \" {", "emoji": "x"} trailing"#;
        assert_eq!(
            extract_json_block(text),
            Some(r#"{"title": "Curly } brace \" {", "emoji": "x"}"#)
        );
    }

    #[test]
    fn test_extract_json_block_missing_or_unbalanced() {
        assert_eq!(extract_json_block("no json here"), None);
        assert_eq!(extract_json_block("{\"title\": \"open"), None);
        assert_eq!(extract_json_block("} {"), None);
    }

    #[test]
    fn test_parse_applies_location_filter_and_default_ages() {
        let filters = FilterSpec {
            location: Some(Location::Kitchen),
            ..Default::default()
        };
        let content = r#"{"title":"Mini Chefs","description":"Make tiny sandwiches.","emoji":"🥪","duration":"15min","materials":"household"}"#;
        let activity = parse_generated_activity(content, &filters, "ai-1-abc".to_string()).unwrap();

        assert_eq!(activity.locations, vec![Location::Kitchen]);
        assert_eq!(activity.age_groups, AgeGroup::ALL.to_vec());
        assert_eq!(activity.duration, Duration::FifteenMinutes);
        assert!(activity.validate().is_ok());
    }

    #[test]
    fn test_parse_defaults_to_indoor() {
        let filters = FilterSpec {
            age_group: Some(AgeGroup::Ages2To4),
            ..Default::default()
        };
        let content = r#"{"title":"Pillow Path","description":"Hop across pillows.","emoji":"🛏️","duration":"5min","materials":"none"}"#;
        let activity = parse_generated_activity(content, &filters, "ai-1-abc".to_string()).unwrap();

        assert_eq!(activity.locations, vec![Location::Indoor]);
        assert_eq!(activity.age_groups, vec![AgeGroup::Ages2To4]);
    }

    #[test]
    fn test_parse_rejects_out_of_set_enum() {
        let content = r#"{"title":"Long Hike","description":"Walk.","emoji":"🥾","duration":"2hours","materials":"none"}"#;
        assert!(matches!(
            parse_generated_activity(content, &FilterSpec::default(), "ai-1".to_string()),
            Err(GenerationError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_field_and_empty_title() {
        let missing = r#"{"title":"No Emoji","description":"x","duration":"5min","materials":"none"}"#;
        assert!(matches!(
            parse_generated_activity(missing, &FilterSpec::default(), "ai-1".to_string()),
            Err(GenerationError::ParseError(_))
        ));

        let empty = r#"{"title":"  ","description":"x","emoji":"x","duration":"5min","materials":"none"}"#;
        assert!(matches!(
            parse_generated_activity(empty, &FilterSpec::default(), "ai-1".to_string()),
            Err(GenerationError::ParseError(_))
        ));
    }

    #[test]
    fn test_generated_id_shape() {
        let mut rng = StdRng::seed_from_u64(3);
        let id = generate_activity_id(&mut rng);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "ai");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), ID_SUFFIX_LENGTH);
        assert!(parts[2].bytes().all(|b| ID_ALPHABET.contains(&b)));

        assert_ne!(id, generate_activity_id(&mut rng));
    }

    #[test]
    fn test_prepare_rejects_bogus_age_group() {
        let request: GenerationRequest =
            serde_json::from_value(json!({ "filters": { "ageGroup": "bogus" } })).unwrap();
        assert!(matches!(
            request.prepare(),
            Err(GenerationError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_prepare_without_filters() {
        let request: GenerationRequest = serde_json::from_value(json!({})).unwrap();
        let prepared = request.prepare().unwrap();
        assert_eq!(prepared.filters, FilterSpec::default());
        assert!(prepared.recent_titles.is_empty());
    }

    #[test]
    fn test_prepare_tolerates_malformed_history() {
        let request: GenerationRequest =
            serde_json::from_value(json!({ "recentActivities": "Blanket Fort" })).unwrap();
        assert!(!request.has_recent_activities());
        assert!(request.prepare().unwrap().recent_titles.is_empty());
    }

    #[test]
    fn test_prepare_treats_non_object_filters_as_none() {
        let request: GenerationRequest =
            serde_json::from_value(json!({ "filters": "kitchen", "recentActivities": 5 }))
                .unwrap();
        assert_eq!(request.prepare().unwrap().filters, FilterSpec::default());
    }

    #[test]
    fn test_new_round_trips_through_prepare() {
        let filters = FilterSpec {
            location: Some(Location::Kitchen),
            ..Default::default()
        };
        let request = GenerationRequest::new(filters, &["Bug Safari".to_string()]);
        assert!(request.has_recent_activities());
        assert_eq!(
            request.prepare().unwrap(),
            PreparedRequest {
                filters,
                recent_titles: vec!["Bug Safari".to_string()],
            }
        );
    }

    #[test]
    fn test_recent_titles_keeps_newest_five() {
        let mut recent = RecentTitles::default();
        assert!(recent.is_empty());
        for i in 0..7 {
            recent.push(format!("Title {}", i));
        }
        assert_eq!(
            recent.to_vec(),
            vec!["Title 6", "Title 5", "Title 4", "Title 3", "Title 2"]
        );
    }
}
