use anyhow::{Context, Result, anyhow};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use game_core::UserStats;
use game_types::User;

const STATS_WRITE_ATTEMPTS: usize = 5;

#[derive(Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub(crate) fn model_to_user(model: users::Model) -> User {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            wins: model.wins,
            games_played: model.games_played,
            win_percentage: model.win_percentage,
            created_at: model.created_at.to_rfc3339(),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(user_model.map(Self::model_to_user))
    }

    /// Insert a new user. Returns `None` when the name is already taken.
    pub async fn create_user(&self, user: User) -> Result<Option<User>> {
        let now = chrono::Utc::now().into();
        let created_at = chrono::DateTime::parse_from_rfc3339(&user.created_at)
            .unwrap_or_else(|_| chrono::Utc::now().into());

        let user_model = users::ActiveModel {
            id: ActiveValue::Set(user.id),
            name: ActiveValue::Set(user.name.clone()),
            email: ActiveValue::Set(user.email),
            wins: ActiveValue::Set(user.wins),
            games_played: ActiveValue::Set(user.games_played),
            win_percentage: ActiveValue::Set(user.win_percentage),
            created_at: ActiveValue::Set(created_at),
            updated_at: ActiveValue::Set(now),
        };

        if let Err(err) = Users::insert(user_model).exec(&self.db).await {
            if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
                debug!("User name {} already taken: {}", user.name, detail);
                return Ok(None);
            }
            return Err(err.into());
        }

        // Fetch the created user
        let created_user = Users::find_by_id(user.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        debug!("Created user {}", created_user.name);
        Ok(Some(Self::model_to_user(created_user)))
    }

    /// Users ordered by win percentage, then games played, both descending
    pub async fn get_rankings(&self) -> Result<Vec<User>> {
        let users = Users::find()
            .order_by_desc(users::Column::WinPercentage)
            .order_by_desc(users::Column::GamesPlayed)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_user).collect())
    }
}

/// Fold one finished game into the stored totals of `user_id` and return the
/// updated user. The write only lands if the counters are still the ones that
/// were read, otherwise the row is re-read and the result applied again.
pub(crate) async fn record_game_result<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    won: bool,
) -> Result<User> {
    for _ in 0..STATS_WRITE_ATTEMPTS {
        let mut user = Users::find_by_id(user_id)
            .one(conn)
            .await?
            .map(UserRepository::model_to_user)
            .with_context(|| format!("User {} not found", user_id))?;
        let seen_games = user.games_played;
        UserStats::apply_game_result(&mut user, won);

        let changes = users::ActiveModel {
            wins: ActiveValue::Set(user.wins),
            games_played: ActiveValue::Set(user.games_played),
            win_percentage: ActiveValue::Set(user.win_percentage),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let result = Users::update_many()
            .set(changes)
            .filter(users::Column::Id.eq(user_id))
            .filter(users::Column::GamesPlayed.eq(seen_games))
            .exec(conn)
            .await?;

        if result.rows_affected == 1 {
            return Ok(user);
        }
        warn!(%user_id, seen_games, "User totals changed underneath, retrying");
    }

    Err(anyhow!(
        "Could not record game result for user {} after {} attempts",
        user_id,
        STATS_WRITE_ATTEMPTS
    ))
}
