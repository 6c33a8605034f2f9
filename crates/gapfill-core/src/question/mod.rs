//! Question records
//!
//! The in-memory shape of one question handed over by the host question
//! bank for export. Options are a tagged union with one variant per
//! question type family.

pub mod builder;
pub mod model;

pub use builder::QuestionBuilder;
pub use model::{
    Answer, AnswerDisplay, CalculatedAnswer, CalculatedOptions, ClozeSubquestion,
    CombinedFeedback, DatasetDefinition, DatasetItem, EssayOptions, GapfillOptions, Hint,
    MatchOptions, MatchSubquestion, MultiAnswerOptions, MultiChoiceOptions, NumericalOptions,
    Question, QuestionOptions, ShortAnswerOptions, TrueFalseOptions, Unit,
};
