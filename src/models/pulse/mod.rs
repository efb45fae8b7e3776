mod queries;
mod types;

pub use queries::{
    create_form, get_active_form, get_form, has_submitted, list_responses, submit_response,
};
pub use types::{
    AnswerLine, AnswerValue, PulseForm, PulseFormInput, PulseResponse, PulseResponseView,
    Question, QuestionInput, QuestionKind, build_questions, validate_answers,
};
