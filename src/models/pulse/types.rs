use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Question kind determines the legal shape of its answer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "pill-select")]
    PillSelect,
    #[serde(rename = "text")]
    Text,
}

impl QuestionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "rating" => Some(QuestionKind::Rating),
            "pill-select" => Some(QuestionKind::PillSelect),
            "text" => Some(QuestionKind::Text),
            _ => None,
        }
    }
}

/// A single question embedded in a pulse form's ordered question list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    pub fn is_rating(&self) -> bool {
        self.kind == QuestionKind::Rating
    }

    pub fn is_pill_select(&self) -> bool {
        self.kind == QuestionKind::PillSelect
    }

    pub fn is_text(&self) -> bool {
        self.kind == QuestionKind::Text
    }

    /// The rating scale offered for rating questions.
    pub fn scale(&self) -> &'static [i64] {
        &[1, 2, 3, 4, 5]
    }

    /// Parse a raw submitted value against this question's kind.
    /// A kind/shape mismatch is rejected here, before anything is stored.
    pub fn parse_answer(&self, raw: &str) -> Result<AnswerValue, String> {
        match self.kind {
            QuestionKind::Rating => {
                let n: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("\"{}\": rating must be a number", self.prompt))?;
                if !(1..=5).contains(&n) {
                    return Err(format!("\"{}\": rating must be between 1 and 5", self.prompt));
                }
                Ok(AnswerValue::Rating(n))
            }
            QuestionKind::PillSelect => {
                if self.options.iter().any(|o| o == raw) {
                    Ok(AnswerValue::Choice(raw.to_string()))
                } else {
                    Err(format!("\"{}\": not one of the offered options", self.prompt))
                }
            }
            QuestionKind::Text => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Err(format!("\"{}\": an answer is required", self.prompt))
                } else {
                    Ok(AnswerValue::Text(trimmed.to_string()))
                }
            }
        }
    }
}

/// A validated answer. One variant per question kind, so a mismatched
/// answer type is a construction-time error rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValue {
    Rating(i64),
    Choice(String),
    Text(String),
}

impl AnswerValue {
    pub fn display(&self) -> String {
        match self {
            AnswerValue::Rating(n) => n.to_string(),
            AnswerValue::Choice(s) | AnswerValue::Text(s) => s.clone(),
        }
    }
}

/// A pulse form row. At most one form has is_active = true at any time.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PulseForm {
    pub id: i64,
    pub week_label: String,
    pub questions: Json<Vec<Question>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl PulseForm {
    pub fn question_list(&self) -> &[Question] {
        &self.questions
    }
}

/// A member's one-time response to a form. Immutable once written.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PulseResponse {
    pub id: i64,
    pub form_id: i64,
    pub member_id: i64,
    pub answers: Json<HashMap<String, AnswerValue>>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A response flattened for the admin review table, answers in question order.
#[derive(Debug, Clone)]
pub struct PulseResponseView {
    pub id: i64,
    pub member_name: String,
    pub answers: Vec<AnswerLine>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AnswerLine {
    pub prompt: String,
    pub value: String,
}

/// One question row as submitted by the form builder.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionInput {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub options: Option<String>,
}

/// Form input for publishing a pulse form. `questions` is a JSON array of
/// QuestionInput assembled by the builder page.
#[derive(Debug, Clone, Deserialize)]
pub struct PulseFormInput {
    pub week_label: String,
    pub questions: String,
    pub csrf_token: String,
}

/// Assemble builder rows into the embedded question list.
///
/// Options for pill-select questions come in as one comma-separated string
/// and are split and whitespace-trimmed; empty entries after trimming are
/// kept as entered (the builder page discourages them, the server does not
/// reject them).
pub fn build_questions(inputs: &[QuestionInput]) -> Result<Vec<Question>, Vec<String>> {
    let mut errors = Vec::new();
    let mut questions = Vec::with_capacity(inputs.len());
    let mut seen_ids: Vec<&str> = Vec::new();

    if inputs.is_empty() {
        return Err(vec!["A pulse form needs at least one question".to_string()]);
    }

    for (i, input) in inputs.iter().enumerate() {
        let n = i + 1;
        if seen_ids.contains(&input.id.as_str()) {
            errors.push(format!("Question {n}: duplicate question id"));
            continue;
        }
        seen_ids.push(&input.id);

        let prompt = input.question.trim();
        if prompt.is_empty() {
            errors.push(format!("Question {n}: question text is required"));
            continue;
        }

        let Some(kind) = QuestionKind::parse(&input.kind) else {
            errors.push(format!("Question {n}: unknown question type '{}'", input.kind));
            continue;
        };

        let options = match kind {
            QuestionKind::PillSelect => input
                .options
                .as_deref()
                .unwrap_or("")
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            _ => Vec::new(),
        };

        questions.push(Question {
            id: input.id.clone(),
            prompt: prompt.to_string(),
            kind,
            options,
        });
    }

    if errors.is_empty() {
        Ok(questions)
    } else {
        Err(errors)
    }
}

/// Validate a raw submitted answer map against a form's question list.
///
/// Every question must be answered with a value of the right shape, and
/// answers for unknown question ids are rejected. Returns the typed answer
/// map on success, or every validation message on failure.
pub fn validate_answers(
    questions: &[Question],
    raw: &HashMap<String, String>,
) -> Result<HashMap<String, AnswerValue>, Vec<String>> {
    let mut errors = Vec::new();
    let mut answers = HashMap::with_capacity(questions.len());

    for question in questions {
        match raw.get(&question.id) {
            Some(value) => match question.parse_answer(value) {
                Ok(answer) => {
                    answers.insert(question.id.clone(), answer);
                }
                Err(e) => errors.push(e),
            },
            None => errors.push(format!("\"{}\": an answer is required", question.prompt)),
        }
    }

    for key in raw.keys() {
        if !questions.iter().any(|q| &q.id == key) {
            errors.push(format!("Answer for unknown question id '{key}'"));
        }
    }

    if errors.is_empty() {
        Ok(answers)
    } else {
        Err(errors)
    }
}
