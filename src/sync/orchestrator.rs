use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use super::auth::AuthSession;
use super::scheduler::{self, SyncScheduler};
use crate::destroyable::Destroyable;
use crate::events::{EventObserver, Unsubscriber};
use crate::model::GameEngineEvent;

/// Listens to the engine's events and hands every changed profile to the
/// scheduler. Must live inside a tokio runtime context.
pub struct SyncOrchestrator {
    scheduler: SyncScheduler,
    auth: AuthSession,
    subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for SyncOrchestrator {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SyncOrchestrator {
    pub fn attach(
        game_engine_event_observer: &EventObserver<GameEngineEvent>,
        scheduler: SyncScheduler,
        auth: AuthSession,
    ) -> Rc<RefCell<Self>> {
        let orchestrator = Rc::new(RefCell::new(Self {
            scheduler,
            auth,
            subscription: None,
        }));
        let weak = Rc::downgrade(&orchestrator);
        let subscription = game_engine_event_observer.subscribe(move |event| {
            let GameEngineEvent::ProfileChanged(profile) = event else {
                return;
            };
            if let Some(orchestrator) = weak.upgrade() {
                let mut orchestrator = orchestrator.borrow_mut();
                let SyncOrchestrator {
                    scheduler, auth, ..
                } = &mut *orchestrator;
                if scheduler.schedule(auth, profile.clone()) {
                    trace!(target: "sync", "Queued sync of {}", profile.id);
                }
            }
        });
        orchestrator.borrow_mut().subscription = Some(subscription);
        orchestrator
    }

    /// Signing in or out applies to the next profile change; a save already
    /// waiting keeps the credential it was scheduled with.
    pub fn set_auth(&mut self, auth: AuthSession) {
        self.auth = auth;
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Waits for the pending save without keeping the orchestrator borrowed,
    /// so events may keep flowing meanwhile.
    pub async fn flush(this: &Rc<RefCell<Self>>) {
        let pending = this.borrow_mut().scheduler.take_pending();
        if let Some(handle) = pending {
            scheduler::join(handle).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::events::Channel;
    use crate::game::settings::Settings;
    use crate::model::{AchievementId, UserProfile};
    use crate::sync::{Credential, InMemoryProfileStore, ProfileStore, SyncNotice};

    fn quick_settings() -> Settings {
        let mut settings = Settings::default();
        settings.sync_debounce_ms = 20;
        settings
    }

    async fn signed_in(profile: &UserProfile) -> (Arc<InMemoryProfileStore>, AuthSession) {
        let store = Arc::new(InMemoryProfileStore::new());
        let credential = Credential::new("token");
        store.register(&credential, profile.id).await;
        (store, AuthSession::signed_in(profile.id, "ada", credential))
    }

    fn quick_scheduler(
        store: &Arc<InMemoryProfileStore>,
    ) -> (SyncScheduler, mpsc::UnboundedReceiver<SyncNotice>) {
        SyncScheduler::with_settings(store.clone(), &quick_settings())
    }

    #[tokio::test]
    async fn test_profile_changes_are_saved_once() {
        let mut profile = UserProfile::new("Ada");
        let (store, auth) = signed_in(&profile).await;
        let (scheduler, mut notices) = quick_scheduler(&store);
        let (emitter, observer) = Channel::<GameEngineEvent>::new();
        let orchestrator = SyncOrchestrator::attach(&observer, scheduler, auth);

        for _ in 0..3 {
            profile.add_coins(10);
            emitter.emit(&GameEngineEvent::ProfileChanged(profile.clone()));
        }
        assert!(orchestrator.borrow().is_pending());
        SyncOrchestrator::flush(&orchestrator).await;

        assert_eq!(store.save_count(), 1);
        assert_eq!(notices.recv().await, Some(SyncNotice::Saved(profile.id)));
        let credential = orchestrator.borrow().auth().credential().cloned().unwrap();
        let stored = store.load(&credential, profile.id).await.unwrap();
        assert_eq!(stored.coins, 30);
    }

    #[tokio::test]
    async fn test_other_events_do_not_sync() {
        let profile = UserProfile::new("Ada");
        let (store, auth) = signed_in(&profile).await;
        let (scheduler, _notices) = quick_scheduler(&store);
        let (emitter, observer) = Channel::<GameEngineEvent>::new();
        let orchestrator = SyncOrchestrator::attach(&observer, scheduler, auth);

        emitter.emit(&GameEngineEvent::LeveledUp(2));
        emitter.emit(&GameEngineEvent::AchievementUnlocked(AchievementId::FirstProblem));
        assert!(!orchestrator.borrow().is_pending());
        SyncOrchestrator::flush(&orchestrator).await;
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_signing_out_stops_sync() {
        let profile = UserProfile::new("Ada");
        let (store, auth) = signed_in(&profile).await;
        let (scheduler, _notices) = quick_scheduler(&store);
        let (emitter, observer) = Channel::<GameEngineEvent>::new();
        let orchestrator = SyncOrchestrator::attach(&observer, scheduler, auth);

        let mut auth = orchestrator.borrow().auth().clone();
        auth.sign_out();
        orchestrator.borrow_mut().set_auth(auth);
        emitter.emit(&GameEngineEvent::ProfileChanged(profile));
        assert!(!orchestrator.borrow().is_pending());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_destroy_detaches_from_events() {
        let profile = UserProfile::new("Ada");
        let (store, auth) = signed_in(&profile).await;
        let (scheduler, _notices) = quick_scheduler(&store);
        let (emitter, observer) = Channel::<GameEngineEvent>::new();
        let orchestrator = SyncOrchestrator::attach(&observer, scheduler, auth);
        assert_eq!(emitter.listener_count(), 1);

        orchestrator.borrow_mut().destroy();
        assert_eq!(emitter.listener_count(), 0);
        emitter.emit(&GameEngineEvent::ProfileChanged(profile));
        assert!(!orchestrator.borrow().is_pending());
    }
}
