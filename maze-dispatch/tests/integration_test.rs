use std::sync::Arc;

use maze_core::{Coordinate, Dimension, SolutionStatus};
use maze_dispatch::{create_maze, DispatchError, Dispatcher, InMemoryStore, Settings, Steps, Store};

fn dispatcher_with_inline_solving() -> (Arc<dyn Store>, Dispatcher) {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let settings = Settings {
        deta_runtime: true,
        ..Settings::default()
    };
    let dispatcher = Dispatcher::new(Arc::clone(&store), &settings);
    (store, dispatcher)
}

#[test]
fn single_corridor_maze_solves_min_and_max() {
    let (store, dispatcher) = dispatcher_with_inline_solving();
    let dimension = Dimension::new(3, 3);
    let entrance = Coordinate::new(0, 0);
    let walls = vec![Coordinate::new(1, 0), Coordinate::new(1, 1), Coordinate::new(1, 2)];

    let maze = create_maze(store.as_ref(), "alice", dimension, entrance, walls).unwrap();

    let min_path = dispatcher.solve(&maze, Steps::Min).unwrap();
    assert_eq!(min_path, vec![Coordinate::new(0, 0), Coordinate::new(0, 1), Coordinate::new(0, 2)]);

    let max_path = dispatcher.solve(&maze, Steps::Max).unwrap();
    assert_eq!(max_path.first(), Some(&entrance));
    assert_eq!(max_path.last(), Some(&Coordinate::new(0, 2)));

    // Asking for min again after max has been solved still returns the
    // shortest path, not the longest one.
    assert_eq!(dispatcher.solve(&maze, Steps::Min).unwrap(), min_path);
}

#[test]
fn maze_with_two_exits_is_invalid() {
    let (store, dispatcher) = dispatcher_with_inline_solving();
    let dimension = Dimension::new(3, 3);
    let entrance = Coordinate::new(1, 0);
    let maze = create_maze(store.as_ref(), "alice", dimension, entrance, vec![]).unwrap();

    let err = dispatcher.solve(&maze, Steps::Min).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidMaze(SolutionStatus::InvalidMultiExit)));
}

#[test]
fn entrance_inside_a_wall_is_invalid() {
    let (store, dispatcher) = dispatcher_with_inline_solving();
    let dimension = Dimension::new(3, 3);
    let entrance = Coordinate::new(0, 0);
    let maze = create_maze(store.as_ref(), "alice", dimension, entrance, vec![entrance]).unwrap();

    let err = dispatcher.solve(&maze, Steps::Min).unwrap_err();
    assert!(matches!(err, DispatchError::InvalidMaze(SolutionStatus::InvalidEntryInWall)));
}

#[test]
fn resubmitting_the_same_geometry_reuses_the_maze_and_solution() {
    let (store, dispatcher) = dispatcher_with_inline_solving();
    let dimension = Dimension::new(3, 3);
    let entrance = Coordinate::new(0, 0);
    let walls = vec![Coordinate::new(1, 0), Coordinate::new(1, 1), Coordinate::new(1, 2)];

    let first = create_maze(store.as_ref(), "alice", dimension, entrance, walls.clone()).unwrap();
    let second = create_maze(store.as_ref(), "alice", dimension, entrance, walls).unwrap();
    assert_eq!(first.id, second.id);

    let path_a = dispatcher.solve(&first, Steps::Min).unwrap();
    let path_b = dispatcher.solve(&second, Steps::Min).unwrap();
    assert_eq!(path_a, path_b);
}

#[test]
fn pooled_dispatcher_solves_distinct_mazes_concurrently() {
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&store), &Settings::default()));

    let handles: Vec<_> = (0..4)
        .map(|column| {
            let store = Arc::clone(&store);
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                // A 4-wide grid walled everywhere except one column gives
                // a single straight-down corridor to a unique exit.
                let dimension = Dimension::new(4, 4);
                let entrance = Coordinate::new(column, 0);
                let walls: Vec<Coordinate> = (0..4u32)
                    .flat_map(|row| (0..4u32).map(move |col| Coordinate::new(col, row)))
                    .filter(|c| c.col != column)
                    .collect();
                let maze = create_maze(store.as_ref(), "racer", dimension, entrance, walls).unwrap();
                dispatcher.solve(&maze, Steps::Min)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}
