use std::sync::Arc;

use routing::{DirectionsError, DirectionsProvider, Geocoder};
use tokio::task::{self, AbortHandle, JoinSet};

use crate::{
    platform::{LocationProvider, PermissionGate},
    render::MapRenderer,
    scene::Scene,
    state::{Command, Msg, ViewState, update},
};

/// External collaborators a session talks to.
#[derive(Clone)]
pub struct Services {
    pub directions: Arc<dyn DirectionsProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    pub location: Arc<dyn LocationProvider>,
    pub permissions: Arc<dyn PermissionGate>,
}

/// A request task that leaves a flag raised in the view state until it answers.
struct InFlight {
    handle: AbortHandle,
    generation: u64,
}

impl InFlight {
    fn supersede(slot: &mut Option<InFlight>) {
        if let Some(previous) = slot.take() {
            previous.handle.abort();
        }
    }
}

/// Owns the view state and is the only place it changes.
///
/// Background work runs on a [`JoinSet`] and only ever produces a [`Msg`];
/// completions are fed back through [`MapSession::dispatch`] by [`MapSession::next`].
/// A newer route or geocode request aborts the one it supersedes, and any
/// result that still slips through is dropped by its generation. A request task
/// that panics is answered as a failure so its loading flag still comes down.
pub struct MapSession<R> {
    state: ViewState,
    renderer: R,
    services: Services,
    tasks: JoinSet<Msg>,
    route_task: Option<InFlight>,
    geocode_task: Option<InFlight>,
}

impl<R: MapRenderer> MapSession<R> {
    pub fn new(services: Services, renderer: R) -> Self {
        let state = ViewState::new(services.permissions.has_location_permission());
        let mut session = Self {
            state,
            renderer,
            services,
            tasks: JoinSet::new(),
            route_task: None,
            geocode_task: None,
        };
        session.render();
        session
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Must be called from within a Tokio runtime when the message can start work.
    pub fn dispatch(&mut self, msg: Msg) {
        let (next, command) = update(&self.state, msg);
        if next.error != self.state.error {
            if let Some(err) = &next.error {
                tracing::warn!("{err}");
            }
        }
        self.state = next;
        self.render();

        if let Some(command) = command {
            self.run(command);
        }
    }

    /// Waits for the next background completion and applies it.
    /// Returns `false` once nothing is left in flight.
    pub async fn next(&mut self) -> bool {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(msg) => {
                    self.dispatch(msg);
                    return true;
                }
                Err(err) if err.is_cancelled() => {
                    tracing::debug!("superseded request cancelled");
                }
                Err(err) => {
                    tracing::error!("background task failed: {err}");
                    if let Some(msg) = self.failed_answer(err.id()) {
                        self.dispatch(msg);
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Applies completions until nothing is in flight, including follow-up work they start.
    pub async fn settle(&mut self) {
        while self.next().await {}
    }

    /// The answer a crashed request task owes the state.
    fn failed_answer(&self, id: task::Id) -> Option<Msg> {
        let owned_by = |slot: &Option<InFlight>| {
            slot.as_ref()
                .filter(|task| task.handle.id() == id)
                .map(|task| task.generation)
        };

        if let Some(generation) = owned_by(&self.route_task) {
            return Some(Msg::RouteResolved {
                generation,
                result: Err(DirectionsError::Transport("route task failed".into())),
            });
        }
        owned_by(&self.geocode_task).map(|generation| Msg::GeocodeResolved {
            generation,
            result: None,
        })
    }

    fn render(&mut self) {
        Scene::project(&self.state).render(&mut self.renderer);
    }

    fn run(&mut self, command: Command) {
        match command {
            Command::RequestPermission => {
                let permissions = Arc::clone(&self.services.permissions);
                self.tasks.spawn(async move {
                    Msg::PermissionResolved(permissions.request_location_permission().await)
                });
            }
            Command::FetchLocation => {
                let location = Arc::clone(&self.services.location);
                self.tasks
                    .spawn(async move { Msg::LocationResolved(location.last_location().await) });
            }
            Command::Geocode { generation, query } => {
                InFlight::supersede(&mut self.geocode_task);
                tracing::debug!("geocoding request {generation}");
                let geocoder = Arc::clone(&self.services.geocoder);
                let handle = self.tasks.spawn(async move {
                    let result = geocoder.geocode(&query).await;
                    Msg::GeocodeResolved { generation, result }
                });
                self.geocode_task = Some(InFlight { handle, generation });
            }
            Command::FetchRoute {
                generation,
                request,
            } => {
                InFlight::supersede(&mut self.route_task);
                tracing::info!(
                    "route request {generation}: {} -> {}",
                    request.origin,
                    request.destination
                );
                let directions = Arc::clone(&self.services.directions);
                let handle = self.tasks.spawn(async move {
                    let result = directions.route(request).await;
                    Msg::RouteResolved { generation, result }
                });
                self.route_task = Some(InFlight { handle, generation });
            }
        }
    }
}
