//! Load-state tracking for externally referenced assets. Every model or
//! texture the room pulls in goes through [`AssetLoadState`], so rendering
//! code can select a representation with a single exhaustive match.

use bevy::asset::io::AssetReaderError;
use bevy::asset::{Asset, AssetLoadError, AssetServer, Handle, LoadState};
use thiserror::Error;

/// Why a load settled in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AssetFailure {
    #[error("asset not found")]
    NotFound,
    #[error("asset source unreachable")]
    Network,
    #[error("asset data failed to decode")]
    Decode,
}

impl AssetFailure {
    pub fn classify(error: &AssetLoadError) -> Self {
        match error {
            AssetLoadError::AssetReaderError(AssetReaderError::NotFound(_)) => Self::NotFound,
            AssetLoadError::AssetReaderError(_) => Self::Network,
            AssetLoadError::MissingAssetSourceError(_) => Self::Network,
            _ => Self::Decode,
        }
    }
}

/// Lifecycle of one tracked asset. `Missing` is the no-reference terminal:
/// nothing was requested and nothing ever arrives. The only transitions are
/// `Pending -> Ready` and `Pending -> Failed`; restarting a load replaces
/// the whole value with a fresh `Pending`, so a superseded in-flight result
/// has no handle left to report through.
pub enum AssetLoadState<A: Asset> {
    Missing,
    Pending { handle: Handle<A> },
    Ready { handle: Handle<A> },
    Failed { failure: AssetFailure },
}

/// Emitted by [`AssetLoadState::poll`] on the frame a load settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTransition {
    Ready,
    Failed(AssetFailure),
}

impl<A: Asset> Default for AssetLoadState<A> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<A: Asset> Clone for AssetLoadState<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Missing => Self::Missing,
            Self::Pending { handle } => Self::Pending {
                handle: handle.clone(),
            },
            Self::Ready { handle } => Self::Ready {
                handle: handle.clone(),
            },
            Self::Failed { failure } => Self::Failed { failure: *failure },
        }
    }
}

impl<A: Asset> std::fmt::Debug for AssetLoadState<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Missing"),
            Self::Pending { handle } => write!(f, "Pending({:?})", handle.id()),
            Self::Ready { handle } => write!(f, "Ready({:?})", handle.id()),
            Self::Failed { failure } => write!(f, "Failed({failure})"),
        }
    }
}

impl<A: Asset> AssetLoadState<A> {
    /// Fresh `Pending` for a newly issued load.
    pub fn begin(handle: Handle<A>) -> Self {
        Self::Pending { handle }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Settled means no further transition can happen without a new load.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    pub fn ready_handle(&self) -> Option<&Handle<A>> {
        match self {
            Self::Ready { handle } => Some(handle),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<AssetFailure> {
        match self {
            Self::Failed { failure } => Some(*failure),
            _ => None,
        }
    }

    /// Observes the asset server for the currently installed handle and
    /// performs at most one `Pending -> Ready/Failed` transition. Returns
    /// the transition on the frame it happens, `None` otherwise.
    pub fn poll(&mut self, asset_server: &AssetServer) -> Option<LoadTransition> {
        let Self::Pending { handle } = &*self else {
            return None;
        };
        let handle = handle.clone();

        match asset_server.load_state(handle.id()) {
            LoadState::Loaded => {
                *self = Self::Ready { handle };
                Some(LoadTransition::Ready)
            }
            LoadState::Failed(error) => {
                let failure = AssetFailure::classify(&error);
                *self = Self::Failed { failure };
                Some(LoadTransition::Failed(failure))
            }
            LoadState::NotLoaded | LoadState::Loading => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn missing_is_the_default_and_already_settled() {
        let state = AssetLoadState::<bevy::image::Image>::default();
        assert!(matches!(state, AssetLoadState::Missing));
        assert!(state.is_settled());
        assert!(state.ready_handle().is_none());
    }

    #[test]
    fn reader_not_found_classifies_as_not_found() {
        let error =
            AssetLoadError::AssetReaderError(AssetReaderError::NotFound(PathBuf::from("a.glb")));
        assert_eq!(AssetFailure::classify(&error), AssetFailure::NotFound);
    }

    #[test]
    fn reader_io_trouble_classifies_as_network() {
        let error = AssetLoadError::AssetReaderError(AssetReaderError::Io(Arc::new(
            std::io::Error::other("connection reset"),
        )));
        assert_eq!(AssetFailure::classify(&error), AssetFailure::Network);
    }
}
