use std::collections::HashMap;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::{info, warn};
use uuid::Uuid;

use super::generator::RandomSource;
use super::progress::record_battle_score;
use crate::model::{BattleParticipant, BattleStatus, UserProfile};

pub const MAX_PLAYERS: usize = 10;
pub const ROOM_CODE_LENGTH: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ROOM_CODE_ATTEMPTS: usize = 5;
const POINTS_PER_CORRECT: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("no room with code {0}")]
    UnknownRoom(String),
    #[error("room is {0:?}, expected {1:?}")]
    WrongStatus(BattleStatus, BattleStatus),
    #[error("room is full ({0} players)")]
    Full(usize),
    #[error("only the host can start the battle")]
    NotHost,
    #[error("{0} is not in this room")]
    NotParticipant(Uuid),
    #[error("{0} has already been credited for this battle")]
    AlreadySettled(Uuid),
    #[error("could not find a free room code after {0} attempts")]
    CodesExhausted(usize),
}

pub fn generate_room_code<S: RandomSource>(source: &mut S) -> String {
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_ALPHABET[source.index(ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleRoom {
    pub id: Uuid,
    pub room_code: String,
    pub host_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: BattleStatus,
    pub max_players: usize,
    participants: Vec<BattleParticipant>,
}

impl BattleRoom {
    pub fn new(room_code: String, host_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_code,
            host_id,
            created_at: now,
            ended_at: None,
            status: BattleStatus::Waiting,
            max_players: MAX_PLAYERS,
            participants: vec![],
        }
    }

    fn expect_status(&self, expected: BattleStatus) -> Result<(), BattleError> {
        if self.status != expected {
            return Err(BattleError::WrongStatus(self.status, expected));
        }
        Ok(())
    }

    pub fn participants(&self) -> &[BattleParticipant] {
        &self.participants
    }

    pub fn participant(&self, user_id: Uuid) -> Option<&BattleParticipant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Joining a room twice is accepted and changes nothing.
    pub fn join(&mut self, user_id: Uuid, display_name: &str) -> Result<(), BattleError> {
        if self.participant(user_id).is_some() {
            return Ok(());
        }
        self.expect_status(BattleStatus::Waiting)?;
        if self.participants.len() >= self.max_players {
            return Err(BattleError::Full(self.max_players));
        }
        self.participants
            .push(BattleParticipant::new(user_id, display_name));
        Ok(())
    }

    pub fn start(&mut self, by: Uuid) -> Result<(), BattleError> {
        if by != self.host_id {
            return Err(BattleError::NotHost);
        }
        self.expect_status(BattleStatus::Waiting)?;
        self.status = BattleStatus::Playing;
        info!(
            target: "battle",
            "Room {} started with {} players",
            self.room_code,
            self.participants.len()
        );
        Ok(())
    }

    pub fn record_answer(&mut self, user_id: Uuid, is_correct: bool) -> Result<u64, BattleError> {
        self.expect_status(BattleStatus::Playing)?;
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or(BattleError::NotParticipant(user_id))?;
        if is_correct {
            participant.score += POINTS_PER_CORRECT;
            participant.correct_count += 1;
        }
        Ok(participant.score)
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<(), BattleError> {
        self.expect_status(BattleStatus::Playing)?;
        self.status = BattleStatus::Ended;
        self.ended_at = Some(now);
        Ok(())
    }

    /// Credits the player's final score to their profile once the battle is
    /// over. Each participant can be settled only once.
    pub fn settle(&mut self, profile: &mut UserProfile) -> Result<u64, BattleError> {
        self.expect_status(BattleStatus::Ended)?;
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.user_id == profile.id)
            .ok_or(BattleError::NotParticipant(profile.id))?;
        if participant.settled {
            return Err(BattleError::AlreadySettled(profile.id));
        }
        participant.settled = true;
        record_battle_score(profile, participant.score);
        Ok(participant.score)
    }

    /// Participants by score, highest first; ties keep join order.
    pub fn standings(&self) -> Vec<&BattleParticipant> {
        self.participants
            .iter()
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .collect()
    }
}

/// Rooms addressable by their (case-insensitive) code.
#[derive(Debug, Default)]
pub struct BattleLobby {
    rooms: HashMap<String, BattleRoom>,
}

impl BattleLobby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a room under a fresh code with the host already joined.
    pub fn create_room<S: RandomSource>(
        &mut self,
        source: &mut S,
        host_id: Uuid,
        host_name: &str,
        now: DateTime<Utc>,
    ) -> Result<&mut BattleRoom, BattleError> {
        for _ in 0..ROOM_CODE_ATTEMPTS {
            let code = generate_room_code(source);
            if self.rooms.contains_key(&code) {
                warn!(target: "battle", "Room code {} already taken, retrying", code);
                continue;
            }
            let mut room = BattleRoom::new(code.clone(), host_id, now);
            room.join(host_id, host_name)?;
            return Ok(self.rooms.entry(code).or_insert(room));
        }
        Err(BattleError::CodesExhausted(ROOM_CODE_ATTEMPTS))
    }

    pub fn room_mut(&mut self, code: &str) -> Result<&mut BattleRoom, BattleError> {
        let code = code.trim().to_uppercase();
        self.rooms
            .get_mut(&code)
            .ok_or(BattleError::UnknownRoom(code))
    }

    pub fn room(&self, code: &str) -> Option<&BattleRoom> {
        self.rooms.get(&code.trim().to_uppercase())
    }

    /// The oldest room still waiting for players and not full.
    pub fn waiting_room(&self) -> Option<&BattleRoom> {
        self.rooms
            .values()
            .filter(|r| r.status == BattleStatus::Waiting && r.participants.len() < r.max_players)
            .min_by_key(|r| r.created_at)
    }

    pub fn join(
        &mut self,
        code: &str,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(), BattleError> {
        self.room_mut(code)?.join(user_id, display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::generator::tests::ScriptedSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn playing_room() -> (BattleRoom, Uuid, Uuid) {
        let host = Uuid::new_v4();
        let guest = Uuid::new_v4();
        let mut room = BattleRoom::new("ABC123".to_string(), host, Utc::now());
        room.join(host, "Host").unwrap();
        room.join(guest, "Guest").unwrap();
        room.start(host).unwrap();
        (room, host, guest)
    }

    #[test]
    fn test_room_code_shape() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LENGTH);
            assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_join_rules() {
        let host = Uuid::new_v4();
        let mut room = BattleRoom::new("ROOM01".to_string(), host, Utc::now());
        for i in 0..MAX_PLAYERS {
            room.join(Uuid::new_v4(), &format!("Player {i}")).unwrap();
        }
        assert_eq!(room.join(Uuid::new_v4(), "Late"), Err(BattleError::Full(MAX_PLAYERS)));

        let first = room.participants()[0].user_id;
        assert_eq!(room.join(first, "Again"), Ok(()));
        assert_eq!(room.participants().len(), MAX_PLAYERS);
    }

    #[test]
    fn test_only_host_starts_and_late_joins_fail() {
        let host = Uuid::new_v4();
        let mut room = BattleRoom::new("ROOM02".to_string(), host, Utc::now());
        room.join(host, "Host").unwrap();
        assert_eq!(room.start(Uuid::new_v4()), Err(BattleError::NotHost));
        room.start(host).unwrap();
        assert_eq!(
            room.join(Uuid::new_v4(), "Late"),
            Err(BattleError::WrongStatus(BattleStatus::Playing, BattleStatus::Waiting))
        );
    }

    #[test]
    fn test_scoring_and_standings() {
        let (mut room, host, guest) = playing_room();
        room.record_answer(host, true).unwrap();
        room.record_answer(guest, true).unwrap();
        room.record_answer(guest, false).unwrap();
        assert_eq!(room.record_answer(guest, true), Ok(200));
        let stranger = Uuid::new_v4();
        assert_eq!(
            room.record_answer(stranger, true),
            Err(BattleError::NotParticipant(stranger))
        );
        let standings = room.standings();
        assert_eq!(standings[0].user_id, guest);
        assert_eq!(standings[0].correct_count, 2);
        assert_eq!(standings[1].score, 100);

        room.end(Utc::now()).unwrap();
        assert!(room.ended_at.is_some());
        assert!(room.record_answer(host, true).is_err());
    }

    #[test]
    fn test_settle_folds_score_into_profile() {
        let mut profile = UserProfile::new("Guest");
        let host = Uuid::new_v4();
        let mut room = BattleRoom::new("ROOM03".to_string(), host, Utc::now());
        room.join(host, "Host").unwrap();
        room.join(profile.id, "Guest").unwrap();
        room.start(host).unwrap();
        room.record_answer(profile.id, true).unwrap();

        assert!(room.settle(&mut profile).is_err());
        room.end(Utc::now()).unwrap();
        assert_eq!(room.settle(&mut profile), Ok(100));
        assert_eq!(profile.stats.mode_scores.battle, 100);

        assert_eq!(
            room.settle(&mut profile),
            Err(BattleError::AlreadySettled(profile.id))
        );
        assert_eq!(profile.stats.mode_scores.battle, 100);
        assert!(room.participant(profile.id).unwrap().settled);
    }

    #[test]
    fn test_lobby_lookup_is_case_insensitive() {
        let mut lobby = BattleLobby::new();
        let mut source = StdRng::seed_from_u64(8);
        let host = Uuid::new_v4();
        let code = lobby
            .create_room(&mut source, host, "Host", Utc::now())
            .unwrap()
            .room_code
            .clone();

        lobby.join(&code.to_lowercase(), Uuid::new_v4(), "Guest").unwrap();
        assert_eq!(lobby.room(&code).map(|r| r.participants().len()), Some(2));
        assert_eq!(lobby.waiting_room().map(|r| r.room_code.clone()), Some(code));
        assert!(matches!(lobby.join("NOPE00", host, "Host"), Err(BattleError::UnknownRoom(_))));
    }

    #[test]
    fn test_lobby_retries_taken_codes() {
        let mut lobby = BattleLobby::new();
        let host = Uuid::new_v4();
        let mut source = ScriptedSource::default();
        lobby.create_room(&mut source, host, "Host", Utc::now()).unwrap();
        // a scripted source that always yields index 0 keeps producing "AAAAAA"
        assert_eq!(
            lobby.create_room(&mut source, host, "Host", Utc::now()).map(|r| r.room_code.clone()),
            Err(BattleError::CodesExhausted(ROOM_CODE_ATTEMPTS))
        );
    }
}
