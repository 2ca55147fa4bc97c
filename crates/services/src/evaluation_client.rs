//! HTTP client for the evaluation service: question generation and grading.

use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::model::{Answer, Question, QuestionId, QuizContext, SubmissionResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{QuizConfig, QuizSettings};
use crate::error::{EvaluationClientError, LoadFailure, SubmissionFailure};
use crate::evaluation::{GradingRequest, GradingService, QuestionSource};

const QUESTIONS_PATH: &str = "api/evaluation/evaluate-mixed";
const GRADING_PATH: &str = "api/evaluation/submit-and-save";

/// `reqwest`-backed [`QuestionSource`] and [`GradingService`].
#[derive(Clone)]
pub struct HttpEvaluationClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
    settings: QuizSettings,
}

impl HttpEvaluationClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationClientError` if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &QuizConfig) -> Result<Self, EvaluationClientError> {
        let base_url = Url::parse(&config.api.base_url)?;
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            base_url,
            token: config.api.token.clone(),
            settings: config.quiz.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, EvaluationClientError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, EvaluationClientError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.endpoint(path)?).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvaluationClientError::HttpStatus { status, body });
        }
        Ok(response.json().await?)
    }

    fn questions_request<'a>(&'a self, context: &'a QuizContext) -> QuestionsRequest<'a> {
        let modules_topics = context.is_positioning().then(|| {
            HashMap::from([(context.module_id().as_str(), context.topics())])
        });
        QuestionsRequest {
            topics: context.topics(),
            num_questions: self.settings.num_questions,
            mcq_weight: self.settings.mcq_weight,
            open_weight: 1.0 - self.settings.mcq_weight,
            language: &self.settings.language,
            is_positioning: context.is_positioning(),
            modules_topics,
            course_filter: Some(context.course_title()),
        }
    }

    fn grading_request<'a>(&'a self, request: &'a GradingRequest) -> GradingPayload<'a> {
        let context = &request.context;
        let (questions, responses) = request
            .ordered_answers()
            .into_iter()
            .map(|(question, answer)| (question_payload(question), response_text(question, answer)))
            .unzip();
        GradingPayload {
            questions,
            responses,
            topics: context.topics(),
            course: context.course_title(),
            module: context.module_id().as_str(),
            evaluation_type: if context.is_positioning() {
                "positionnement"
            } else {
                "module_mixed"
            },
            language: &self.settings.language,
            is_final: false,
        }
    }
}

impl std::fmt::Debug for HttpEvaluationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEvaluationClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl QuestionSource for HttpEvaluationClient {
    #[tracing::instrument(
        skip(self, context),
        fields(course = context.course_title(), module = %context.module_id())
    )]
    async fn fetch_questions(&self, context: &QuizContext) -> Result<Vec<Question>, LoadFailure> {
        let body = self.questions_request(context);
        let response: QuestionsResponse = self.post_json(QUESTIONS_PATH, &body).await?;
        let questions = parse_questions(response.questions)?;
        tracing::debug!(count = questions.len(), "questions received");
        Ok(questions)
    }
}

#[async_trait]
impl GradingService for HttpEvaluationClient {
    #[tracing::instrument(
        skip(self, request),
        fields(course = request.context.course_title(), questions = request.questions.len())
    )]
    async fn submit_answers(
        &self,
        request: &GradingRequest,
    ) -> Result<SubmissionResult, SubmissionFailure> {
        let body = self.grading_request(request);
        let response: GradingResponse = self.post_json(GRADING_PATH, &body).await?;
        response.into_result()
    }
}

//
// ─── WIRE FORMAT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct QuestionsRequest<'a> {
    topics: &'a [String],
    num_questions: u32,
    mcq_weight: f64,
    open_weight: f64,
    language: &'a str,
    is_positioning: bool,
    modules_topics: Option<HashMap<&'a str, &'a [String]>>,
    course_filter: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QuestionsResponse {
    questions: Vec<Value>,
}

#[derive(Debug, Serialize)]
struct GradingPayload<'a> {
    questions: Vec<Value>,
    responses: Vec<String>,
    topics: &'a [String],
    course: &'a str,
    module: &'a str,
    evaluation_type: &'static str,
    language: &'a str,
    is_final: bool,
}

#[derive(Debug, Deserialize)]
struct GradingResponse {
    grading_result: GradingResult,
    #[serde(default)]
    final_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct GradingResult {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    study_guide: Option<String>,
    #[serde(default)]
    final_score: Option<f64>,
}

impl GradingResponse {
    fn into_result(self) -> Result<SubmissionResult, SubmissionFailure> {
        let score = self
            .grading_result
            .final_score
            .or(self.final_score)
            .ok_or_else(|| SubmissionFailure::Malformed("missing final_score".into()))?;
        let result = SubmissionResult::from_score(score, self.grading_result.results)
            .map_err(|err| SubmissionFailure::Malformed(err.to_string()))?;
        Ok(match self.grading_result.study_guide {
            Some(guide) => result.with_study_guide(guide),
            None => result,
        })
    }
}

/// Decode the service's list-shaped questions.
///
/// Seven or eight entries: prompt, four options, correct answer, references
/// and optional feedback. Three entries: prompt, expected elements,
/// references. Ids follow list order starting at 1. The raw entry is kept as
/// the grading payload.
fn parse_questions(raw: Vec<Value>) -> Result<Vec<Question>, LoadFailure> {
    raw.into_iter()
        .zip(1u64..)
        .map(|(entry, position)| parse_question(QuestionId::new(position), entry))
        .collect()
}

fn parse_question(id: QuestionId, entry: Value) -> Result<Question, LoadFailure> {
    let malformed = |reason: &str| LoadFailure::Malformed(format!("question {id}: {reason}"));
    let items = entry.as_array().ok_or_else(|| malformed("expected a list"))?;
    let text = |index: usize| {
        items
            .get(index)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| malformed("expected text"))
    };

    let question = match items.len() {
        7 | 8 => {
            let options = (1..=4).map(text).collect::<Result<Vec<_>, _>>()?;
            Question::multiple_choice(id, text(0)?, options)?
        }
        3 => Question::open_text(id, text(0)?)?,
        n => return Err(malformed(&format!("unexpected list of {n} entries"))),
    };
    Ok(question.with_grading_payload(entry))
}

fn question_payload(question: &Question) -> Value {
    if let Some(payload) = question.grading_payload() {
        return payload.clone();
    }
    let mut items = vec![Value::from(question.prompt())];
    items.extend(question.options().iter().map(|o| Value::from(o.as_str())));
    Value::Array(items)
}

fn response_text(question: &Question, answer: Option<&Answer>) -> String {
    match answer {
        Some(Answer::Choice(index)) => question
            .options()
            .get(*index)
            .cloned()
            .unwrap_or_default(),
        Some(Answer::Text(text)) => text.clone(),
        None => String::new(),
    }
}
