use serde::Serialize;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::game_service::GameService;
use game_types::{
    CreateUserRequest, GameError, HighScoresQuery, MakeMoveRequest, NewGameRequest, StringMessage,
};

pub mod config;
pub mod error;
pub mod game_service;

pub use error::ServiceError;

pub const CANCEL_FAILED_MESSAGE: &str = "Cancel game failed! This game has completed!";

pub fn create_routes(
    service: Arc<GameService>,
    high_scores_max: u64,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map({
        let service = service.clone();
        move || service.clone()
    });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_user = warp::path!("user")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_create_user);

    let new_game = warp::path!("game")
        .and(warp::post())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_new_game);

    let get_game = warp::path!("game" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_game);

    let make_move = warp::path!("game" / String)
        .and(warp::put())
        .and(warp::body::json())
        .and(service_filter.clone())
        .and_then(handle_make_move);

    let cancel_game = warp::path!("game" / String / "cancel")
        .and(warp::delete())
        .and(service_filter.clone())
        .and_then(handle_cancel_game);

    let game_history = warp::path!("game" / String / "history")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_game_history);

    let scores = warp::path!("scores")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_scores);

    let user_scores = warp::path!("scores" / "user" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_scores);

    let high_scores = warp::path!("scores" / "high_scores")
        .and(warp::get())
        .and(warp::query::<HighScoresQuery>())
        .and(warp::any().map(move || high_scores_max))
        .and(service_filter.clone())
        .and_then(handle_high_scores);

    let user_games = warp::path!("games" / "user" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_games);

    let user_rankings = warp::path!("user_rankings")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_rankings);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(create_user)
        .or(new_game)
        .or(get_game)
        .or(make_move)
        .or(cancel_game)
        .or(game_history)
        .or(scores)
        .or(user_scores)
        .or(high_scores)
        .or(user_games)
        .or(user_rankings)
        .with(cors)
        .with(warp::log("hangman"))
}

fn json_reply<T: Serialize>(result: Result<T, ServiceError>) -> WithStatus<Json> {
    match result {
        Ok(value) => warp::reply::with_status(warp::reply::json(&value), StatusCode::OK),
        Err(err) => error_reply(&err),
    }
}

fn error_reply(err: &ServiceError) -> WithStatus<Json> {
    let status = err.status_code();

    match err {
        ServiceError::Game(GameError::GameAlreadyOver) => warp::reply::with_status(
            warp::reply::json(&StringMessage::new(err.to_string())),
            status,
        ),
        ServiceError::Game(game_error) => warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": err.to_string(),
                "kind": game_error,
            })),
            status,
        ),
        ServiceError::Persistence(e) => {
            tracing::error!("Request failed: {:#}", e);
            warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Internal server error"
                })),
                status,
            )
        }
    }
}

async fn handle_create_user(
    request: CreateUserRequest,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(
        service.create_user(&request.user_name, request.email).await,
    ))
}

async fn handle_new_game(
    request: NewGameRequest,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.new_game(&request.user_name).await))
}

async fn handle_get_game(
    game_key: String,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.get_game(&game_key).await))
}

async fn handle_make_move(
    game_key: String,
    request: MakeMoveRequest,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.make_move(&game_key, &request.guess).await))
}

async fn handle_cancel_game(
    game_key: String,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match service.cancel_game(&game_key).await {
        Err(err) if err.game_error() == Some(&GameError::GameAlreadyOver) => {
            Ok(warp::reply::with_status(
                warp::reply::json(&StringMessage::new(CANCEL_FAILED_MESSAGE)),
                StatusCode::OK,
            ))
        }
        result => Ok(json_reply(result)),
    }
}

async fn handle_game_history(
    game_key: String,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.get_game_history(&game_key).await))
}

async fn handle_scores(service: Arc<GameService>) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.list_scores().await))
}

async fn handle_user_scores(
    user_name: String,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.list_user_scores(&user_name).await))
}

async fn handle_high_scores(
    query: HighScoresQuery,
    high_scores_max: u64,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let limit = query.number_of_results.unwrap_or(high_scores_max).min(high_scores_max);
    Ok(json_reply(service.get_high_scores(Some(limit)).await))
}

async fn handle_user_games(
    user_name: String,
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.list_user_games(&user_name).await))
}

async fn handle_user_rankings(
    service: Arc<GameService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(json_reply(service.get_user_rankings().await))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use game_core::WordSource;
    use game_persistence::Store;
    use game_types::{GameHistory, GameStatus, GameView, ScoreView, UserRanking};
    use migration::{Migrator, MigratorTrait};
    use serde::de::DeserializeOwned;

    struct FixedWord(&'static str);

    impl WordSource for FixedWord {
        fn random_word(&self) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    async fn create_test_app(
        word: &'static str,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        // Create in-memory database for tests
        let db = game_persistence::connection::connect_to_memory_database()
            .await
            .unwrap();
        Migrator::up(&db, None).await.unwrap();

        let service = Arc::new(GameService::new(Store::new(db), Arc::new(FixedWord(word))));
        create_routes(service, 10)
    }

    fn body<T: DeserializeOwned>(response: &warp::http::Response<warp::hyper::body::Bytes>) -> T {
        serde_json::from_slice(response.body()).unwrap()
    }

    async fn start_game<F>(app: &F, user_name: &str) -> GameView
    where
        F: Filter + Clone + Send + Sync + 'static,
        F::Extract: warp::Reply + Send,
    {
        let response = warp::test::request()
            .method("POST")
            .path("/user")
            .json(&serde_json::json!({ "user_name": user_name }))
            .reply(app)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("POST")
            .path("/game")
            .json(&serde_json::json!({ "user_name": user_name }))
            .reply(app)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body(&response)
    }

    async fn guess<F>(app: &F, key: &str, letter: &str) -> GameView
    where
        F: Filter + Clone + Send + Sync + 'static,
        F::Extract: warp::Reply + Send,
    {
        let response = warp::test::request()
            .method("PUT")
            .path(&format!("/game/{}", key))
            .json(&serde_json::json!({ "guess": letter }))
            .reply(app)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body(&response)
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app("cat").await;
        let response = warp::test::request().path("/health").reply(&app).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user_conflict() {
        let app = create_test_app("cat").await;

        let request = || {
            warp::test::request()
                .method("POST")
                .path("/user")
                .json(&serde_json::json!({ "user_name": "alice", "email": "a@example.com" }))
        };

        let response = request().reply(&app).await;
        assert_eq!(response.status(), StatusCode::OK);
        let message: StringMessage = body(&response);
        assert_eq!(message.message, "User alice created!");

        let response = request().reply(&app).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_full_game_over_http() {
        let app = create_test_app("cat").await;
        let game = start_game(&app, "alice").await;
        assert_eq!(game.reveal, "_ _ _");
        assert_eq!(game.message, "Good luck playing Hangman!");

        let view = guess(&app, &game.urlsafe_key, "c").await;
        assert_eq!(view.reveal, "c _ _");
        let view = guess(&app, &game.urlsafe_key, "z").await;
        assert_eq!(view.missed_letters, "z");
        assert_eq!(view.guesses_remaining, 5);
        guess(&app, &game.urlsafe_key, "a").await;
        let view = guess(&app, &game.urlsafe_key, "t").await;
        assert!(view.game_over);
        assert_eq!(view.status, GameStatus::Won);
        assert_eq!(view.message, "You win! Target word is: cat.");
        assert_eq!(view.used_letters, "czat");

        let response = warp::test::request()
            .path(&format!("/game/{}/history", game.urlsafe_key))
            .reply(&app)
            .await;
        let history: GameHistory = body(&response);
        assert!(history.game_over);
        assert_eq!(history.history.len(), 4);
        assert_eq!(history.history[1].guess, "z");

        let response = warp::test::request()
            .path("/scores/high_scores?number_of_results=5")
            .reply(&app)
            .await;
        let scores: Vec<ScoreView> = body(&response);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].guesses, 4);
        assert_eq!(scores[0].missed_letters, 1);

        let response = warp::test::request().path("/user_rankings").reply(&app).await;
        let rankings: Vec<UserRanking> = body(&response);
        assert_eq!(rankings[0].user_name, "alice");
        assert_eq!(rankings[0].win_percentage, 1.0);

        let response = warp::test::request()
            .method("DELETE")
            .path(&format!("/game/{}/cancel", game.urlsafe_key))
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let message: StringMessage = body(&response);
        assert_eq!(message.message, CANCEL_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_cancel_then_not_found() {
        let app = create_test_app("cat").await;
        let game = start_game(&app, "bob").await;

        let cancel = || {
            warp::test::request()
                .method("DELETE")
                .path(&format!("/game/{}/cancel", game.urlsafe_key))
        };

        let response = cancel().reply(&app).await;
        assert_eq!(response.status(), StatusCode::OK);
        let message: StringMessage = body(&response);
        assert_eq!(message.message, "Game canceled!");

        let response = cancel().reply(&app).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = warp::test::request()
            .path(&format!("/game/{}", game.urlsafe_key))
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_keys_and_unknown_users() {
        let app = create_test_app("cat").await;

        let response = warp::test::request()
            .path("/game/not-a-real-key")
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = warp::test::request()
            .path("/scores/user/ghost")
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = warp::test::request()
            .method("POST")
            .path("/game")
            .json(&serde_json::json!({ "user_name": "ghost" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_target_word() {
        let app = create_test_app("not-a-word").await;

        warp::test::request()
            .method("POST")
            .path("/user")
            .json(&serde_json::json!({ "user_name": "carol" }))
            .reply(&app)
            .await;

        let response = warp::test::request()
            .method("POST")
            .path("/game")
            .json(&serde_json::json!({ "user_name": "carol" }))
            .reply(&app)
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_user_games_lists_running_games() {
        let app = create_test_app("a").await;
        let first = start_game(&app, "dave").await;

        let response = warp::test::request()
            .method("POST")
            .path("/game")
            .json(&serde_json::json!({ "user_name": "dave" }))
            .reply(&app)
            .await;
        let second: GameView = body(&response);

        guess(&app, &first.urlsafe_key, "a").await;

        let response = warp::test::request()
            .path("/games/user/dave")
            .reply(&app)
            .await;
        let games: Vec<GameView> = body(&response);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].urlsafe_key, second.urlsafe_key);
        assert_eq!(games[0].message, "Time to make a move!");
    }
}
