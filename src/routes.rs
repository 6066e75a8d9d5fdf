// Route definitions

use crate::handlers;
use crate::relay::RelayServer;
use std::path::PathBuf;
use std::sync::Arc;
use warp::Filter;

pub fn configure_routes(
    relay: Arc<RelayServer>,
    public_dir: PathBuf,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let relay = warp::any().map(move || Arc::clone(&relay));

    // GET /socket (websocket upgrade)
    let socket = warp::path("socket")
        .and(warp::path::end())
        .and(warp::ws())
        .and(relay)
        .map(|ws: warp::ws::Ws, relay: Arc<RelayServer>| {
            ws.on_upgrade(move |socket| handlers::client_connected(socket, relay))
        });

    // GET /* (display and visitor pages)
    let static_files = warp::get().and(warp::fs::dir(public_dir));

    socket.or(static_files)
}
