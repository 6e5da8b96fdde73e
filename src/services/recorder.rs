// src/services/recorder.rs

//! Grades a submitted quiz and persists its answers and result.

use std::collections::{HashMap, HashSet};

use crate::{
    error::AppError,
    models::{
        answer::NewAnswer,
        competition::Competition,
        question::{AnswerOption, CompetitionQuestion},
        result::{NewResult, QuizOutcome, SubmittedAnswer},
        user::UserIdentity,
    },
    services::results,
    store::Store,
};

/// Score summary of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Score {
    pub score: i32,
    pub total_questions: i32,
    pub percentage: String,
}

/// `score / total * 100` to one decimal place, halves rounded up.
/// An empty quiz is "0.0".
pub fn format_percentage(score: i32, total: i32) -> String {
    if total <= 0 {
        return "0.0".to_string();
    }
    let percentage = score as f64 / total as f64 * 100.0;
    // `{:.1}` alone rounds 6.25 to "6.2"
    let tenths = (percentage * 10.0).round() as i64;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Grades each presented question against the selection made for it.
/// Returns the per-question correctness in presentation order plus the score.
pub fn grade(
    presented: &[(&CompetitionQuestion, Option<AnswerOption>)],
) -> (Vec<bool>, Score) {
    let marks: Vec<bool> = presented
        .iter()
        .map(|(question, selected)| question.is_correct(*selected))
        .collect();

    let score = marks.iter().filter(|correct| **correct).count() as i32;
    let total_questions = marks.len() as i32;

    (
        marks,
        Score {
            score,
            total_questions,
            percentage: format_percentage(score, total_questions),
        },
    )
}

fn participant_name(user: &UserIdentity) -> String {
    user.name
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(user.email.as_deref())
        .unwrap_or("Scout")
        .to_string()
}

/// Records one attempt: one answer row per presented question, then one
/// result row. The writes are independent; a failure part-way leaves the
/// earlier answers without a result, which aggregation ignores.
pub async fn record_attempt(
    store: &dyn Store,
    competition: &Competition,
    user: &UserIdentity,
    submitted: &[SubmittedAnswer],
) -> Result<QuizOutcome, AppError> {
    if submitted.is_empty() {
        return Err(AppError::BadRequest("No answers submitted".to_string()));
    }
    if submitted.len() > competition.number_of_questions.max(0) as usize {
        return Err(AppError::BadRequest(format!(
            "At most {} questions may be submitted",
            competition.number_of_questions
        )));
    }

    let bank: HashMap<String, CompetitionQuestion> = store
        .list_questions(&competition.id)
        .await?
        .into_iter()
        .map(|q| (q.id.clone(), q))
        .collect();

    let mut seen = HashSet::new();
    let mut presented = Vec::with_capacity(submitted.len());
    for answer in submitted {
        let question = bank.get(&answer.question_id).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown question {}", answer.question_id))
        })?;
        if !seen.insert(answer.question_id.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Question {} submitted twice",
                answer.question_id
            )));
        }
        presented.push((question, answer.selected_answer));
    }

    let (marks, score) = grade(&presented);

    for ((question, selected), is_correct) in presented.iter().zip(marks) {
        store
            .create_answer(NewAnswer {
                competition_id: competition.id.clone(),
                user_id: user.id.clone(),
                question_id: question.id.clone(),
                selected_answer: *selected,
                is_correct,
            })
            .await?;
    }

    let result = results::record(
        store,
        NewResult {
            competition_id: competition.id.clone(),
            user_id: user.id.clone(),
            user_name: participant_name(user),
            user_email: user.email.clone(),
            score: score.score,
            total_questions: score.total_questions,
            percentage: score.percentage.clone(),
        },
    )
    .await?;

    tracing::info!(
        "Recorded result {} for user {} in competition {}: {}/{}",
        result.id,
        user.id,
        competition.id,
        score.score,
        score.total_questions
    );

    Ok(QuizOutcome {
        result_id: result.id,
        score: score.score,
        total_questions: score.total_questions,
        percentage: score.percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::competition::EntryMode,
        services::fixtures,
        store::MemoryStore,
    };

    fn identity(id: &str) -> UserIdentity {
        UserIdentity {
            id: id.to_string(),
            name: Some("Rana".to_string()),
            email: Some("rana@example.com".to_string()),
        }
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(1, 2), "50.0");
        assert_eq!(format_percentage(1, 3), "33.3");
        assert_eq!(format_percentage(2, 3), "66.7");
        assert_eq!(format_percentage(3, 3), "100.0");
        assert_eq!(format_percentage(0, 4), "0.0");
        assert_eq!(format_percentage(0, 0), "0.0");
    }

    #[test]
    fn test_format_percentage_rounds_halves_up() {
        assert_eq!(format_percentage(1, 16), "6.3");
        assert_eq!(format_percentage(5, 16), "31.3");
        assert_eq!(format_percentage(3, 32), "9.4");
        assert_eq!(format_percentage(1, 8), "12.5");
        // 23/80 lands just below 28.75 in binary, so it stays down
        assert_eq!(format_percentage(23, 80), "28.7");
    }

    #[tokio::test]
    async fn test_two_question_quiz_scores_half() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        let q1 = fixtures::question(&store, &c.id, AnswerOption::A).await;
        let q2 = fixtures::question(&store, &c.id, AnswerOption::B).await;

        let submitted = vec![
            SubmittedAnswer {
                question_id: q1.id.clone(),
                selected_answer: Some(AnswerOption::A),
            },
            SubmittedAnswer {
                question_id: q2.id.clone(),
                selected_answer: Some(AnswerOption::C),
            },
        ];
        let outcome = record_attempt(&store, &c, &identity("u1"), &submitted)
            .await
            .unwrap();

        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.total_questions, 2);
        assert_eq!(outcome.percentage, "50.0");

        let answers = store.list_answers(&c.id, "u1").await.unwrap();
        assert_eq!(answers.len(), 2);
        assert_eq!(answers.iter().filter(|a| a.is_correct).count(), 1);

        let stored = results::results_for_competition(&store, &c.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].user_name, "Rana");
        assert!(stored[0].score <= stored[0].total_questions);
    }

    #[tokio::test]
    async fn test_unanswered_counts_as_incorrect() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        let q1 = fixtures::question(&store, &c.id, AnswerOption::D).await;

        let submitted = vec![SubmittedAnswer {
            question_id: q1.id.clone(),
            selected_answer: None,
        }];
        let outcome = record_attempt(&store, &c, &identity("u1"), &submitted)
            .await
            .unwrap();

        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_questions, 1);
        assert_eq!(outcome.percentage, "0.0");
        let answers = store.list_answers(&c.id, "u1").await.unwrap();
        assert_eq!(answers[0].selected_answer.0, None);
    }

    #[tokio::test]
    async fn test_rejects_foreign_and_duplicate_questions() {
        let store = MemoryStore::new();
        let c = fixtures::competition(&store, EntryMode::Once).await;
        let other = fixtures::competition(&store, EntryMode::Once).await;
        let q1 = fixtures::question(&store, &c.id, AnswerOption::A).await;
        let foreign = fixtures::question(&store, &other.id, AnswerOption::A).await;

        let duplicate = vec![
            SubmittedAnswer {
                question_id: q1.id.clone(),
                selected_answer: Some(AnswerOption::A),
            },
            SubmittedAnswer {
                question_id: q1.id.clone(),
                selected_answer: Some(AnswerOption::A),
            },
        ];
        assert!(matches!(
            record_attempt(&store, &c, &identity("u1"), &duplicate).await,
            Err(AppError::BadRequest(_))
        ));

        let wrong_bank = vec![SubmittedAnswer {
            question_id: foreign.id.clone(),
            selected_answer: Some(AnswerOption::A),
        }];
        assert!(matches!(
            record_attempt(&store, &c, &identity("u1"), &wrong_bank).await,
            Err(AppError::BadRequest(_))
        ));

        assert!(matches!(
            record_attempt(&store, &c, &identity("u1"), &[]).await,
            Err(AppError::BadRequest(_))
        ));

        // nothing was written by the rejected submissions
        assert!(store.list_answers(&c.id, "u1").await.unwrap().is_empty());
        assert!(!results::has_user_entered(&store, &c.id, "u1").await.unwrap());
    }
}
