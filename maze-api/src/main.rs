mod error;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{delete, get, middleware, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use maze_core::{Coordinate, Dimension};
use maze_dispatch::{Dispatcher, InMemoryStore, Settings, Steps, Store, StoredMaze};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use error::AppError;

struct AppState {
    store: Arc<dyn Store>,
    dispatcher: Dispatcher,
}

#[derive(Debug, Deserialize)]
struct MazeInput {
    dimension: String,
    entrance: String,
    #[serde(default)]
    walls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MazeOut {
    id: Uuid,
    mazenum: u64,
    dimension: String,
    entrance: String,
    walls: Vec<String>,
    hash: String,
}

impl From<StoredMaze> for MazeOut {
    fn from(maze: StoredMaze) -> Self {
        Self {
            id: maze.id,
            mazenum: maze.mazenum,
            dimension: maze.dimension.label(),
            entrance: maze.entrance.label(),
            walls: maze.walls.iter().map(Coordinate::label).collect(),
            hash: maze.hash,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MazeSolutionOut {
    path: Vec<String>,
    mazehash: String,
}

#[derive(Debug, Deserialize)]
struct SolutionQuery {
    #[serde(default = "default_mode")]
    mode: String,
}

fn default_mode() -> String {
    "min".to_string()
}

fn owner_id(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get("X-Owner-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .filter(|s| !s.is_empty())
        .ok_or(AppError::MissingOwner)
}

fn parse_maze_input(input: MazeInput) -> Result<(Dimension, Coordinate, Vec<Coordinate>), AppError> {
    let dimension = Dimension::parse(&input.dimension).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let entrance = Coordinate::parse(&input.entrance).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let walls = input
        .walls
        .iter()
        .map(|w| Coordinate::parse(w))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok((dimension, entrance, walls))
}

fn parse_mode(raw: &str) -> Result<Steps, AppError> {
    match raw {
        "min" => Ok(Steps::Min),
        "max" => Ok(Steps::Max),
        other => Err(AppError::BadRequest(format!("mode must be 'min' or 'max', got '{other}'"))),
    }
}

/// POST /maze
/// Creates a maze for the requesting owner, or returns the existing one
/// if an identical maze was already submitted.
#[post("/maze")]
async fn create_maze(
    req: HttpRequest,
    body: web::Json<MazeInput>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner = owner_id(&req)?;
    let (dimension, entrance, walls) = parse_maze_input(body.into_inner())?;
    let maze = maze_dispatch::create_maze(state.store.as_ref(), &owner, dimension, entrance, walls)?;
    Ok(HttpResponse::Created().json(MazeOut::from(maze)))
}

/// GET /maze/{mazenum}
#[get("/maze/{mazenum}")]
async fn get_maze_by_num(
    req: HttpRequest,
    path: web::Path<u64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner = owner_id(&req)?;
    let maze = maze_dispatch::get_maze_by_num(state.store.as_ref(), &owner, path.into_inner())?
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(MazeOut::from(maze)))
}

/// GET /maze/by-id/{mazeid}
#[get("/maze/by-id/{mazeid}")]
async fn get_maze_by_id(
    req: HttpRequest,
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner = owner_id(&req)?;
    let maze = maze_dispatch::get_maze_by_id(state.store.as_ref(), path.into_inner())?.ok_or(AppError::NotFound)?;
    if maze.owner_id != owner {
        return Err(AppError::Forbidden);
    }
    Ok(HttpResponse::Ok().json(MazeOut::from(maze)))
}

/// DELETE /maze/{mazenum}
/// The maze's solution record, if any, is left in the store — it's keyed
/// by content fingerprint, not by this maze's id.
#[delete("/maze/{mazenum}")]
async fn delete_maze_by_num(
    req: HttpRequest,
    path: web::Path<u64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner = owner_id(&req)?;
    let maze = maze_dispatch::get_maze_by_num(state.store.as_ref(), &owner, path.into_inner())?
        .ok_or(AppError::NotFound)?;
    maze_dispatch::delete_maze(state.store.as_ref(), maze.id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /maze/{mazenum}/solution?mode=min|max
#[get("/maze/{mazenum}/solution")]
async fn get_solution(
    req: HttpRequest,
    path: web::Path<u64>,
    query: web::Query<SolutionQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let owner = owner_id(&req)?;
    let steps = parse_mode(&query.mode)?;

    let maze = maze_dispatch::get_maze_by_num(state.store.as_ref(), &owner, path.into_inner())?
        .ok_or(AppError::NotFound)?;

    let hash = maze.hash.clone();
    let solved_path = state.dispatcher.solve(&maze, steps)?;

    Ok(HttpResponse::Ok().json(MazeSolutionOut {
        path: solved_path.iter().map(Coordinate::label).collect(),
        mazehash: hash,
    }))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "maze-api",
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = Settings::from_env();
    tracing::info!("Starting maze API server, binding to {}", settings.bind_addr);

    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let dispatcher = Dispatcher::new(Arc::clone(&store), &settings);
    let state = web::Data::new(AppState { store, dispatcher });
    let bind_addr = settings.bind_addr.clone();

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .expose_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().limit(10_485_760))
            .app_data(state.clone())
            .service(health)
            .service(create_maze)
            .service(get_maze_by_num)
            .service(get_maze_by_id)
            .service(delete_maze_by_num)
            .service(get_solution)
    })
    .bind(bind_addr)?
    .run()
    .await
}
