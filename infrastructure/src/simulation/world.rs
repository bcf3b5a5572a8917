//! Location service that tracks where each character stands

use async_trait::async_trait;
use consensus_application::{CollaboratorError, LocationService};
use consensus_domain::{CharacterId, LocationId, MoveRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use tracing::debug;

pub struct SimulatedLocationService {
    starting_location: LocationId,
    positions: Mutex<HashMap<CharacterId, LocationId>>,
    /// Characters whose moves are always refused
    unreachable: HashSet<CharacterId>,
}

impl SimulatedLocationService {
    pub fn new(starting_location: impl Into<LocationId>) -> Self {
        Self {
            starting_location: starting_location.into(),
            positions: Mutex::new(HashMap::new()),
            unreachable: HashSet::new(),
        }
    }

    pub fn with_unreachable<I, S>(mut self, characters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CharacterId>,
    {
        self.unreachable
            .extend(characters.into_iter().map(Into::into));
        self
    }

    /// Current location of a character; unmoved characters are at the start
    pub fn location_of(&self, character_id: &CharacterId) -> LocationId {
        self.positions
            .lock()
            .ok()
            .and_then(|positions| positions.get(character_id).cloned())
            .unwrap_or_else(|| self.starting_location.clone())
    }
}

#[async_trait]
impl LocationService for SimulatedLocationService {
    async fn move_character(&self, request: &MoveRequest) -> Result<(), CollaboratorError> {
        if self.unreachable.contains(&request.character_id) {
            return Err(CollaboratorError::Rejected(format!(
                "{} cannot reach {}",
                request.character_id, request.to_location_id
            )));
        }

        let mut positions = self
            .positions
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("location state poisoned".to_string()))?;
        debug!(
            "{} travels to {} by {} ({} min)",
            request.character_id, request.to_location_id, request.method, request.estimated_duration
        );
        positions.insert(request.character_id.clone(), request.to_location_id.clone());
        Ok(())
    }
}
