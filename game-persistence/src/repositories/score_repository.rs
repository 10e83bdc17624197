use anyhow::{Context, Result};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entities::{prelude::*, scores, users};
use game_types::Score;

#[derive(Clone)]
pub struct ScoreRepository {
    db: DatabaseConnection,
}

impl ScoreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_score(model: scores::Model) -> Score {
        Score {
            id: model.id,
            user_id: model.user_id,
            date: model.date.format("%Y-%m-%d").to_string(),
            won: model.won,
            total_guesses: model.total_guesses,
            missed_count: model.missed_count,
        }
    }

    fn with_owner_name(
        (score, owner): (scores::Model, Option<users::Model>),
    ) -> Result<(Score, String)> {
        let owner = owner.with_context(|| format!("Score {} has no owner", score.id))?;
        Ok((Self::model_to_score(score), owner.name))
    }

    /// Every score with its owner's name, oldest first
    pub async fn list_all(&self) -> Result<Vec<(Score, String)>> {
        Scores::find()
            .find_also_related(Users)
            .order_by_asc(scores::Column::Date)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::with_owner_name)
            .collect()
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Score>> {
        let scores = Scores::find()
            .filter(scores::Column::UserId.eq(user_id))
            .order_by_asc(scores::Column::Date)
            .all(&self.db)
            .await?;

        Ok(scores.into_iter().map(Self::model_to_score).collect())
    }

    /// Won games ordered by fewest guesses, then fewest misses
    pub async fn get_high_scores(&self, limit: Option<u64>) -> Result<Vec<(Score, String)>> {
        let mut query = Scores::find()
            .find_also_related(Users)
            .filter(scores::Column::Won.eq(true))
            .order_by_asc(scores::Column::TotalGuesses)
            .order_by_asc(scores::Column::MissedCount);

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Self::with_owner_name)
            .collect()
    }
}

pub(crate) async fn insert_score<C: ConnectionTrait>(conn: &C, score: &Score) -> Result<()> {
    let date = chrono::NaiveDate::parse_from_str(&score.date, "%Y-%m-%d")
        .with_context(|| format!("Invalid score date '{}'", score.date))?;

    let score_model = scores::ActiveModel {
        id: ActiveValue::Set(score.id),
        user_id: ActiveValue::Set(score.user_id),
        date: ActiveValue::Set(date),
        won: ActiveValue::Set(score.won),
        total_guesses: ActiveValue::Set(score.total_guesses),
        missed_count: ActiveValue::Set(score.missed_count),
    };

    Scores::insert(score_model).exec(conn).await?;
    Ok(())
}
