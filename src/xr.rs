// xr.rs - XR session bootstrap. Runs beside the scene and never gates it.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::future::{self, AbortHandle, LocalBoxFuture};
use futures::stream::{self, LocalBoxStream};
use futures::task::{LocalSpawnExt, SpawnError};
use futures::{FutureExt, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scene::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XrSessionMode {
    #[default]
    ImmersiveVr,
    ImmersiveAr,
    Inline,
}

impl fmt::Display for XrSessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XrSessionMode::ImmersiveVr => write!(f, "immersive-vr"),
            XrSessionMode::ImmersiveAr => write!(f, "immersive-ar"),
            XrSessionMode::Inline => write!(f, "inline"),
        }
    }
}

/// State changes reported by a running XR experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum XrState {
    EnteringXr,
    InXr,
    ExitingXr,
    NotInXr,
}

impl fmt::Display for XrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XrState::EnteringXr => write!(f, "ENTERING_XR"),
            XrState::InXr => write!(f, "IN_XR"),
            XrState::ExitingXr => write!(f, "EXITING_XR"),
            XrState::NotInXr => write!(f, "NOT_IN_XR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum XrError {
    #[error("{0} sessions are not supported")]
    Unsupported(XrSessionMode),
    #[error("XR permission denied")]
    PermissionDenied,
    #[error("XR runtime error: {0}")]
    Runtime(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XrSessionRequest {
    pub floor_meshes: Vec<ObjectId>,
    pub session_mode: XrSessionMode,
}

/// Result of a granted session request
pub struct XrExperience {
    pub base_experience: Option<BaseExperience>,
}

pub struct BaseExperience {
    pub states: LocalBoxStream<'static, XrState>,
}

/// Host XR integration
pub trait XrRuntime {
    fn name(&self) -> &str;

    fn is_available(&self) -> LocalBoxFuture<'static, bool>;

    fn request_session(&self, request: XrSessionRequest) -> LocalBoxFuture<'static, Result<XrExperience, XrError>>;
}

/// How the bootstrap ended
#[derive(Debug, Clone, PartialEq)]
pub enum XrOutcome {
    Unavailable,
    Failed(XrError),
    NoBaseExperience,
    /// State stream ended
    Completed { transitions: Vec<XrState> },
    Aborted,
}

/// Handle to the spawned bootstrap task
pub struct XrBootstrap {
    abort: AbortHandle,
    transitions: Rc<RefCell<Vec<XrState>>>,
    outcome: Rc<RefCell<Option<XrOutcome>>>,
}

impl XrBootstrap {
    /// Spawn the bootstrap on a local executor. The caller keeps polling the
    /// executor between frames.
    pub fn spawn(
        spawner: &LocalSpawner,
        runtime: Box<dyn XrRuntime>,
        request: XrSessionRequest,
    ) -> Result<Self, SpawnError> {
        let transitions = Rc::new(RefCell::new(Vec::new()));
        let outcome = Rc::new(RefCell::new(None));

        let (task, abort) = future::abortable(bootstrap(runtime, request, transitions.clone()));
        let slot = outcome.clone();
        spawner.spawn_local(async move {
            let result = task.await.unwrap_or_else(|_| {
                log::info!("XR bootstrap aborted");
                XrOutcome::Aborted
            });
            *slot.borrow_mut() = Some(result);
        })?;

        Ok(Self {
            abort,
            transitions,
            outcome,
        })
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    /// States seen so far
    pub fn transitions(&self) -> Vec<XrState> {
        self.transitions.borrow().clone()
    }

    pub fn outcome(&self) -> Option<XrOutcome> {
        self.outcome.borrow().clone()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.borrow().is_some()
    }
}

async fn bootstrap(
    runtime: Box<dyn XrRuntime>,
    request: XrSessionRequest,
    seen: Rc<RefCell<Vec<XrState>>>,
) -> XrOutcome {
    if !runtime.is_available().await {
        log::info!("XR not available on {}, continuing without it", runtime.name());
        return XrOutcome::Unavailable;
    }

    log::info!(
        "Requesting {} session with {} floor meshes",
        request.session_mode,
        request.floor_meshes.len()
    );
    let experience = match runtime.request_session(request).await {
        Ok(experience) => experience,
        Err(e) => {
            log::warn!("XR session request failed: {}", e);
            return XrOutcome::Failed(e);
        }
    };

    let Some(mut base) = experience.base_experience else {
        log::info!("XR experience has no base experience, state changes not observed");
        return XrOutcome::NoBaseExperience;
    };

    while let Some(state) = base.states.next().await {
        log::info!("XR state changed: {}", state);
        seen.borrow_mut().push(state);
    }
    XrOutcome::Completed {
        transitions: seen.borrow().clone(),
    }
}

// === Runtimes ===

/// Host without any XR support
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableXr;

impl XrRuntime for UnavailableXr {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn is_available(&self) -> LocalBoxFuture<'static, bool> {
        future::ready(false).boxed_local()
    }

    fn request_session(&self, request: XrSessionRequest) -> LocalBoxFuture<'static, Result<XrExperience, XrError>> {
        future::ready(Err(XrError::Unsupported(request.session_mode))).boxed_local()
    }
}

/// Scripted runtime: grants or fails the request and replays a state sequence
#[derive(Debug, Clone)]
pub struct SimulatedXr {
    pub failure: Option<XrError>,
    pub states: Vec<XrState>,
    pub with_base_experience: bool,
    requests: Rc<RefCell<Vec<XrSessionRequest>>>,
}

impl Default for SimulatedXr {
    fn default() -> Self {
        Self {
            failure: None,
            states: vec![XrState::EnteringXr, XrState::InXr],
            with_base_experience: true,
            requests: Rc::default(),
        }
    }
}

impl SimulatedXr {
    pub fn failing(error: XrError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_states(mut self, states: Vec<XrState>) -> Self {
        self.states = states;
        self
    }

    pub fn without_base_experience(mut self) -> Self {
        self.with_base_experience = false;
        self
    }

    /// Shared log of requests received, also visible through clones
    pub fn requests(&self) -> Vec<XrSessionRequest> {
        self.requests.borrow().clone()
    }
}

impl XrRuntime for SimulatedXr {
    fn name(&self) -> &str {
        "simulated"
    }

    fn is_available(&self) -> LocalBoxFuture<'static, bool> {
        future::ready(true).boxed_local()
    }

    fn request_session(&self, request: XrSessionRequest) -> LocalBoxFuture<'static, Result<XrExperience, XrError>> {
        self.requests.borrow_mut().push(request);
        let result = match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(XrExperience {
                base_experience: self.with_base_experience.then(|| BaseExperience {
                    states: stream::iter(self.states.clone()).boxed_local(),
                }),
            }),
        };
        future::ready(result).boxed_local()
    }
}
