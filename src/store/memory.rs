// src/store/memory.rs

//! In-process store backing tests and database-less runs.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{Store, new_id};
use crate::{
    error::AppError,
    models::{
        answer::{CompetitionAnswer, NewAnswer, OptionalAnswer},
        competition::{Competition, CompetitionStatus, NewCompetition},
        event::{Event, EventRegistration, EventStatus, NewEvent},
        question::{CompetitionQuestion, NewQuestion},
        result::{CompetitionResult, NewResult, ResultSource},
        user::{Role, UpdateProfileRequest, User, UserIdentity},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    competitions: RwLock<HashMap<String, Competition>>,
    questions: RwLock<Vec<CompetitionQuestion>>,
    legacy_results: RwLock<Vec<CompetitionResult>>,
    results: RwLock<Vec<CompetitionResult>>,
    answers: RwLock<Vec<CompetitionAnswer>>,
    events: RwLock<HashMap<String, Event>>,
    registrations: RwLock<HashMap<String, EventRegistration>>,
    users: RwLock<HashMap<String, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn results_for(&self, source: ResultSource) -> &RwLock<Vec<CompetitionResult>> {
        match source {
            ResultSource::Legacy => &self.legacy_results,
            ResultSource::Current => &self.results,
        }
    }
}

fn newest_registration_first(list: &mut [EventRegistration]) {
    list.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_competition(&self, new: NewCompetition) -> Result<Competition, AppError> {
        let now = Utc::now();
        let competition = Competition {
            id: new_id(),
            title: new.title,
            description: new.description,
            password: new.password,
            entry_mode: new.entry_mode,
            number_of_questions: new.number_of_questions,
            status: new.status,
            participation_points: new.points.participation,
            first_place_points: new.points.first,
            second_place_points: new.points.second,
            third_place_points: new.points.third,
            start_date: new.start_date,
            end_date: new.end_date,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        self.competitions
            .write()
            .await
            .insert(competition.id.clone(), competition.clone());
        Ok(competition)
    }

    async fn get_competition(&self, id: &str) -> Result<Option<Competition>, AppError> {
        Ok(self.competitions.read().await.get(id).cloned())
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, AppError> {
        let mut list: Vec<Competition> = self.competitions.read().await.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn update_competition_status(
        &self,
        id: &str,
        status: CompetitionStatus,
    ) -> Result<bool, AppError> {
        let mut competitions = self.competitions.write().await;
        match competitions.get_mut(id) {
            Some(c) => {
                c.status = status;
                c.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_competition(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.competitions.write().await.remove(id).is_some())
    }

    async fn create_question(&self, new: NewQuestion) -> Result<CompetitionQuestion, AppError> {
        let question = CompetitionQuestion {
            id: new_id(),
            competition_id: new.competition_id,
            question: new.question,
            option_a: new.option_a,
            option_b: new.option_b,
            option_c: new.option_c,
            option_d: new.option_d,
            correct_answer: new.correct_answer,
            created_at: Utc::now(),
        };
        self.questions.write().await.push(question.clone());
        Ok(question)
    }

    async fn list_questions(
        &self,
        competition_id: &str,
    ) -> Result<Vec<CompetitionQuestion>, AppError> {
        Ok(self
            .questions
            .read()
            .await
            .iter()
            .filter(|q| q.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn delete_question(&self, id: &str) -> Result<bool, AppError> {
        let mut questions = self.questions.write().await;
        let before = questions.len();
        questions.retain(|q| q.id != id);
        Ok(questions.len() != before)
    }

    async fn create_result(
        &self,
        source: ResultSource,
        new: NewResult,
    ) -> Result<CompetitionResult, AppError> {
        let result = CompetitionResult {
            id: new_id(),
            competition_id: new.competition_id,
            user_id: new.user_id,
            user_name: new.user_name,
            user_email: new.user_email,
            score: new.score,
            total_questions: new.total_questions,
            percentage: new.percentage,
            completed_at: Utc::now(),
        };
        self.results_for(source).write().await.push(result.clone());
        Ok(result)
    }

    async fn list_results(
        &self,
        source: ResultSource,
        competition_id: &str,
    ) -> Result<Vec<CompetitionResult>, AppError> {
        Ok(self
            .results_for(source)
            .read()
            .await
            .iter()
            .filter(|r| r.competition_id == competition_id)
            .cloned()
            .collect())
    }

    async fn list_all_results(
        &self,
        source: ResultSource,
    ) -> Result<Vec<CompetitionResult>, AppError> {
        Ok(self.results_for(source).read().await.clone())
    }

    async fn has_result(
        &self,
        source: ResultSource,
        competition_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        Ok(self
            .results_for(source)
            .read()
            .await
            .iter()
            .any(|r| r.competition_id == competition_id && r.user_id == user_id))
    }

    async fn delete_results_for_user(
        &self,
        source: ResultSource,
        user_id: &str,
    ) -> Result<u64, AppError> {
        let mut results = self.results_for(source).write().await;
        let before = results.len();
        results.retain(|r| r.user_id != user_id);
        Ok((before - results.len()) as u64)
    }

    async fn create_answer(&self, new: NewAnswer) -> Result<CompetitionAnswer, AppError> {
        let answer = CompetitionAnswer {
            id: new_id(),
            competition_id: new.competition_id,
            user_id: new.user_id,
            question_id: new.question_id,
            selected_answer: OptionalAnswer(new.selected_answer),
            is_correct: new.is_correct,
            created_at: Utc::now(),
        };
        self.answers.write().await.push(answer.clone());
        Ok(answer)
    }

    async fn list_answers(
        &self,
        competition_id: &str,
        user_id: &str,
    ) -> Result<Vec<CompetitionAnswer>, AppError> {
        Ok(self
            .answers
            .read()
            .await
            .iter()
            .filter(|a| a.competition_id == competition_id && a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn delete_answers_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let mut answers = self.answers.write().await;
        let before = answers.len();
        answers.retain(|a| a.user_id != user_id);
        Ok((before - answers.len()) as u64)
    }

    async fn create_event(&self, new: NewEvent) -> Result<Event, AppError> {
        let event = Event {
            id: new_id(),
            title: new.title,
            description: new.description,
            date: new.date,
            location: new.location,
            points: new.points,
            status: EventStatus::Upcoming,
            created_at: Utc::now(),
        };
        self.events
            .write()
            .await
            .insert(event.id.clone(), event.clone());
        Ok(event)
    }

    async fn get_event(&self, id: &str) -> Result<Option<Event>, AppError> {
        Ok(self.events.read().await.get(id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let mut list: Vec<Event> = self.events.read().await.values().cloned().collect();
        list.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(list)
    }

    async fn update_event_status(&self, id: &str, status: EventStatus) -> Result<bool, AppError> {
        let mut events = self.events.write().await;
        match events.get_mut(id) {
            Some(e) => {
                e.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_registration(
        &self,
        registration: EventRegistration,
    ) -> Result<EventRegistration, AppError> {
        let mut registrations = self.registrations.write().await;
        if registrations.contains_key(&registration.id) {
            return Err(AppError::Conflict(
                "Already registered for this event".to_string(),
            ));
        }
        registrations.insert(registration.id.clone(), registration.clone());
        Ok(registration)
    }

    async fn get_registration(&self, id: &str) -> Result<Option<EventRegistration>, AppError> {
        Ok(self.registrations.read().await.get(id).cloned())
    }

    async fn list_registrations_by_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError> {
        let mut list: Vec<EventRegistration> = self
            .registrations
            .read()
            .await
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        newest_registration_first(&mut list);
        Ok(list)
    }

    async fn list_registrations_by_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<EventRegistration>, AppError> {
        let mut list: Vec<EventRegistration> = self
            .registrations
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        newest_registration_first(&mut list);
        Ok(list)
    }

    async fn list_registrations(&self) -> Result<Vec<EventRegistration>, AppError> {
        Ok(self.registrations.read().await.values().cloned().collect())
    }

    async fn set_attended(&self, id: &str, attended: bool) -> Result<bool, AppError> {
        let mut registrations = self.registrations.write().await;
        match registrations.get_mut(id) {
            Some(r) => {
                r.attended = attended;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_points_awarded(&self, id: &str) -> Result<bool, AppError> {
        let mut registrations = self.registrations.write().await;
        match registrations.get_mut(id) {
            Some(r) if !r.points_awarded => {
                r.points_awarded = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_registrations_for_user(&self, user_id: &str) -> Result<u64, AppError> {
        let mut registrations = self.registrations.write().await;
        let before = registrations.len();
        registrations.retain(|_, r| r.user_id != user_id);
        Ok((before - registrations.len()) as u64)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let mut list: Vec<User> = self.users.read().await.values().cloned().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(list)
    }

    async fn upsert_user(&self, identity: UserIdentity) -> Result<User, AppError> {
        let now = Utc::now();
        let mut users = self.users.write().await;
        let user = users.entry(identity.id.clone()).or_insert_with(|| User {
            id: identity.id.clone(),
            name: None,
            email: None,
            role: Role::User,
            manual_points: 0,
            trophies: Vec::new(),
            age: None,
            phone: None,
            scout_level: None,
            created_at: now,
            updated_at: now,
        });
        user.name = identity.name.or(user.name.take());
        user.email = identity.email.or(user.email.take());
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: &str,
        profile: &UpdateProfileRequest,
    ) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };
        if let Some(age) = profile.age {
            user.age = Some(age);
        }
        if let Some(phone) = &profile.phone {
            user.phone = Some(phone.clone());
        }
        if let Some(level) = &profile.scout_level {
            user.scout_level = Some(level.clone());
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_manual_points(&self, id: &str, points: i32) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(u) => {
                u.manual_points = points;
                u.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(u) => {
                u.role = role;
                u.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_trophies(&self, id: &str, trophies: &[String]) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.get_mut(id) {
            Some(u) => {
                u.trophies = trophies.to_vec();
                u.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.users.write().await.remove(id).is_some())
    }
}
