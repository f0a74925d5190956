use chrono::{DateTime, NaiveDate, Utc};
use courtside_core::models::participant::Participant;
use mockall::mock;
use uuid::Uuid;

use crate::models::{DbCourt, DbParticipant, DbRoom, DbSession, DbUser};

// Mock repositories for handler-level tests
mock! {
    pub UserRepo {
        pub async fn create_user(
            &self,
            username: &'static str,
            email: &'static str,
            name: &'static str,
            password_hash: &'static str,
            is_admin: bool,
        ) -> eyre::Result<DbUser>;

        pub async fn get_user_by_username(
            &self,
            username: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(
            &self,
            email: &'static str,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn verify_credentials(
            &self,
            username: &'static str,
            password: &'static str,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub SessionRepo {
        pub async fn create_session(
            &self,
            token: &'static str,
            user_id: Uuid,
            expires_at: DateTime<Utc>,
        ) -> eyre::Result<DbSession>;

        pub async fn get_session_user(
            &self,
            token: &'static str,
            now: DateTime<Utc>,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn delete_session(
            &self,
            token: &'static str,
        ) -> eyre::Result<()>;
    }
}

mock! {
    pub CourtRepo {
        pub async fn get_court_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbCourt>>;

        pub async fn list_courts(
            &self,
            include_inactive: bool,
        ) -> eyre::Result<Vec<DbCourt>>;

        pub async fn deactivate_court(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub RoomRepo {
        pub async fn get_room_by_link_code(
            &self,
            link_code: &'static str,
        ) -> eyre::Result<Option<DbRoom>>;

        pub async fn get_room_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbRoom>>;

        pub async fn list_rooms(
            &self,
            sport: Option<&'static str>,
            day: Option<NaiveDate>,
        ) -> eyre::Result<Vec<DbRoom>>;

        pub async fn get_court_reservations(
            &self,
            court_id: Uuid,
        ) -> eyre::Result<Vec<DbRoom>>;

        pub async fn set_room_active(
            &self,
            id: Uuid,
            is_active: bool,
        ) -> eyre::Result<bool>;

        pub async fn delete_room(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}

mock! {
    pub ParticipantRepo {
        pub async fn add_participant(
            &self,
            room_id: Uuid,
            user_id: Uuid,
        ) -> eyre::Result<DbParticipant>;

        pub async fn get_participants_by_room(
            &self,
            room_id: Uuid,
        ) -> eyre::Result<Vec<DbParticipant>>;

        pub async fn get_participant_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbParticipant>>;

        pub async fn set_participant_active(
            &self,
            id: Uuid,
            is_active: bool,
        ) -> eyre::Result<bool>;

        pub async fn update_participant(
            &self,
            participant: Participant,
        ) -> eyre::Result<bool>;

        pub async fn delete_participant(
            &self,
            id: Uuid,
        ) -> eyre::Result<bool>;
    }
}
