//! Fire-and-forget dispatch of advice requests.
//!
//! Each purpose (briefing, creative) has its own lane. Every submission gets
//! a ticket number; a reply is published on the lane's watch channel only if
//! its ticket is still the newest one issued, so a slow answer to an old
//! request never overwrites the answer to a newer one. Requests that exceed
//! the desk deadline publish the fallback text.

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{briefing_fallback, Advisor, BriefingSnapshot, CREATIVE_FALLBACK};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdvicePurpose {
    Briefing,
    Creative,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceReply {
    pub purpose: AdvicePurpose,
    pub ticket: u64,
    pub text: String,
}

struct Lane {
    issued: AtomicU64,
    tx: watch::Sender<Option<AdviceReply>>,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl Lane {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            issued: AtomicU64::new(0),
            tx,
            in_flight: Mutex::new(None),
        }
    }

    fn publish(&self, reply: AdviceReply) {
        let ticket = reply.ticket;
        let purpose = reply.purpose;
        let published = self.tx.send_if_modified(|current| {
            let newest = self.issued.load(Ordering::SeqCst);
            let newer_than_shown = current.as_ref().is_none_or(|shown| shown.ticket < ticket);
            if ticket == newest && newer_than_shown {
                *current = Some(reply);
                true
            } else {
                false
            }
        });
        if !published {
            debug!("discarding stale {:?} reply #{}", purpose, ticket);
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        *self.in_flight_guard() = Some(handle);
    }

    fn in_flight_guard(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // Only a handle lives here, so a poisoned lock is still usable
        self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

struct Lanes {
    briefing: Lane,
    creative: Lane,
}

impl Lanes {
    fn get(&self, purpose: AdvicePurpose) -> &Lane {
        match purpose {
            AdvicePurpose::Briefing => &self.briefing,
            AdvicePurpose::Creative => &self.creative,
        }
    }
}

/// Spawns advice requests on the Tokio runtime and keeps the newest reply
/// per purpose. Must be used from within a runtime.
pub struct AdviceDesk<A: Advisor + 'static> {
    advisor: Arc<A>,
    lanes: Arc<Lanes>,
    deadline: Option<Duration>,
}

impl<A: Advisor + 'static> AdviceDesk<A> {
    pub fn new(advisor: A) -> Self {
        Self {
            advisor: Arc::new(advisor),
            lanes: Arc::new(Lanes {
                briefing: Lane::new(),
                creative: Lane::new(),
            }),
            deadline: None,
        }
    }

    /// Publish the fallback text for any request still running after `deadline`.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn advisor(&self) -> &A {
        &self.advisor
    }

    /// Receiver that observes every published reply for `purpose`.
    pub fn subscribe(&self, purpose: AdvicePurpose) -> watch::Receiver<Option<AdviceReply>> {
        self.lanes.get(purpose).tx.subscribe()
    }

    /// Most recently published reply for `purpose`.
    pub fn latest(&self, purpose: AdvicePurpose) -> Option<AdviceReply> {
        self.lanes.get(purpose).tx.borrow().clone()
    }

    pub fn submit_briefing(&self, snapshot: BriefingSnapshot) -> u64 {
        let ticket = self.issue(AdvicePurpose::Briefing);
        let advisor = Arc::clone(&self.advisor);
        let lanes = Arc::clone(&self.lanes);
        let deadline = self.deadline;
        let handle = tokio::spawn(async move {
            let text = match deadline {
                Some(limit) => tokio::time::timeout(limit, advisor.request_briefing(&snapshot))
                    .await
                    .unwrap_or_else(|_| briefing_fallback(&snapshot)),
                None => advisor.request_briefing(&snapshot).await,
            };
            lanes.briefing.publish(AdviceReply {
                purpose: AdvicePurpose::Briefing,
                ticket,
                text,
            });
        });
        self.lanes.briefing.track(handle);
        ticket
    }

    pub fn submit_creative(&self, prompt: String, context: String) -> u64 {
        let ticket = self.issue(AdvicePurpose::Creative);
        let advisor = Arc::clone(&self.advisor);
        let lanes = Arc::clone(&self.lanes);
        let deadline = self.deadline;
        let handle = tokio::spawn(async move {
            let request = advisor.request_creative_advice(&prompt, &context);
            let text = match deadline {
                Some(limit) => tokio::time::timeout(limit, request)
                    .await
                    .unwrap_or_else(|_| CREATIVE_FALLBACK.to_string()),
                None => request.await,
            };
            lanes.creative.publish(AdviceReply {
                purpose: AdvicePurpose::Creative,
                ticket,
                text,
            });
        });
        self.lanes.creative.track(handle);
        ticket
    }

    /// Abort the newest in-flight request for `purpose` and mark every
    /// outstanding one stale.
    pub fn cancel(&self, purpose: AdvicePurpose) {
        let lane = self.lanes.get(purpose);
        lane.issued.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = lane.in_flight_guard().take() {
            handle.abort();
        }
        debug!("cancelled outstanding {:?} requests", purpose);
    }

    fn issue(&self, purpose: AdvicePurpose) -> u64 {
        self.lanes.get(purpose).issued.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::OfflineAdvisor;
    use crate::profile::types::Skills;

    fn snapshot(name: &str) -> BriefingSnapshot {
        BriefingSnapshot {
            name: name.into(),
            level: 1,
            skills: Skills::default(),
            currency: 10,
        }
    }

    #[tokio::test]
    async fn reply_is_published_with_ticket() {
        let desk = AdviceDesk::new(OfflineAdvisor);
        let mut rx = desk.subscribe(AdvicePurpose::Briefing);
        let ticket = desk.submit_briefing(snapshot("Nova"));
        rx.changed().await.unwrap();
        let reply = rx.borrow().clone().unwrap();
        assert_eq!(reply.ticket, ticket);
        assert_eq!(reply.text, briefing_fallback(&snapshot("Nova")));
        assert!(desk.latest(AdvicePurpose::Creative).is_none());
    }

    #[tokio::test]
    async fn tracking_survives_poisoned_lock() {
        let desk = AdviceDesk::new(OfflineAdvisor);
        let lanes = Arc::clone(&desk.lanes);
        let poisoner = std::thread::spawn(move || {
            let _guard = lanes.briefing.in_flight.lock().unwrap();
            panic!("poison the in-flight lock");
        });
        assert!(poisoner.join().is_err());
        assert!(desk.lanes.briefing.in_flight.is_poisoned());

        desk.submit_briefing(snapshot("Nova"));
        assert!(desk.lanes.briefing.in_flight_guard().is_some());
        desk.cancel(AdvicePurpose::Briefing);
        assert!(desk.lanes.briefing.in_flight_guard().is_none());
    }
}
