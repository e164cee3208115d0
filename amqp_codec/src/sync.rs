//! Per-channel synchronous-call tracking.
//!
//! One synchronous method may be outstanding per channel at a time; the
//! tracker detects violations defensively rather than blocking. Waiting for
//! a response, timing out and tearing the connection down are the transport
//! layer's concerns.
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use amqp_wire::types::AmqpChannelId;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::method::{MethodDef, MethodHeader, MethodRegistry};

const CONNECTION_CLOSE: MethodHeader = MethodHeader::new(10, 50);
const CHANNEL_CLOSE: MethodHeader = MethodHeader::new(20, 40);

/// Outstanding synchronous call on one channel.
#[derive(Debug, Clone)]
pub struct PendingSynchronousCall {
    sent: MethodHeader,
    expected: &'static [MethodHeader],
    deadline: Option<Instant>,
}

impl PendingSynchronousCall {
    pub fn sent(&self) -> &MethodHeader {
        &self.sent
    }

    pub fn expected(&self) -> &'static [MethodHeader] {
        self.expected
    }

    pub fn expired(&self, now: Instant) -> bool {
        self.deadline.map(|deadline| now >= deadline).unwrap_or(false)
    }
}

/// What happened to the channel's pending call on receipt of a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The method was a valid response and cleared the pending call.
    Matched,
    /// A broker-initiated close cleared the pending call as a fatal
    /// override.
    CloseOverride,
    /// Nothing was pending and the method is acceptable unsolicited.
    Unrelated,
}

/// Channels are independent, so state is partitioned per channel id. A
/// single lock suffices: every critical section is a map probe.
#[derive(Debug, Default)]
pub struct SyncTracker {
    channels: Mutex<BTreeMap<AmqpChannelId, PendingSynchronousCall>>,
}

impl SyncTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<AmqpChannelId, PendingSynchronousCall>> {
        match self.channels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register the outgoing method. Asynchronous methods never register;
    /// a synchronous method while another is outstanding on the same
    /// channel is a violation.
    pub fn record_send(
        &self,
        channel: AmqpChannelId,
        def: &'static MethodDef,
        timeout: Option<Duration>,
    ) -> Result<()> {
        if !def.synchronous() {
            return Ok(());
        }
        let mut channels = self.lock();
        if let Some(pending) = channels.get(&channel) {
            let msg = format!(
                "channel {}: {} sent while {} awaits its response",
                channel,
                def.name(),
                pending.sent
            );
            error!("{}", msg);
            return Err(Error::SyncViolation(msg));
        }
        debug!("channel {}: awaiting response to {}", channel, def.name());
        channels.insert(
            channel,
            PendingSynchronousCall {
                sent: *def.header(),
                expected: def.responses(),
                deadline: timeout.map(|t| Instant::now() + t),
            },
        );
        Ok(())
    }

    /// Match an incoming method against the channel's pending call.
    ///
    /// With a call outstanding, only a member of its valid-response set or a
    /// broker-initiated close is acceptable. Without one, response-class
    /// methods are unsolicited and rejected; anything else (broker requests,
    /// asynchronous deliveries) passes through.
    pub fn record_receive(
        &self,
        registry: &MethodRegistry,
        channel: AmqpChannelId,
        def: &MethodDef,
    ) -> Result<ReceiveOutcome> {
        let header = *def.header();
        let mut channels = self.lock();

        if header == CONNECTION_CLOSE {
            // connection-fatal: every channel's pending call is void
            let had_pending = !channels.is_empty();
            channels.clear();
            return Ok(if had_pending {
                ReceiveOutcome::CloseOverride
            } else {
                ReceiveOutcome::Unrelated
            });
        }
        if header == CHANNEL_CLOSE {
            return Ok(if channels.remove(&channel).is_some() {
                ReceiveOutcome::CloseOverride
            } else {
                ReceiveOutcome::Unrelated
            });
        }

        match channels.get(&channel) {
            Some(pending) if pending.expected.contains(&header) => {
                debug!(
                    "channel {}: {} matched pending {}",
                    channel,
                    def.name(),
                    pending.sent
                );
                channels.remove(&channel);
                Ok(ReceiveOutcome::Matched)
            }
            Some(pending) => {
                let msg = format!(
                    "channel {}: got {} while awaiting response to {}",
                    channel,
                    def.name(),
                    pending.sent
                );
                error!("{}", msg);
                Err(Error::SyncViolation(msg))
            }
            None if registry.is_response(&header) => Err(Error::SyncViolation(format!(
                "channel {}: unsolicited response {}",
                channel,
                def.name()
            ))),
            None => Ok(ReceiveOutcome::Unrelated),
        }
    }

    /// Clear the channel's pending call without a match. For caller-owned
    /// timeout or cancellation.
    pub fn abandon(&self, channel: AmqpChannelId) -> Option<PendingSynchronousCall> {
        self.lock().remove(&channel)
    }

    pub fn pending(&self, channel: AmqpChannelId) -> Option<PendingSynchronousCall> {
        self.lock().get(&channel).cloned()
    }

    /// Whether the channel's pending call has outlived its deadline.
    pub fn expired(&self, channel: AmqpChannelId) -> bool {
        self.lock()
            .get(&channel)
            .map(|pending| pending.expired(Instant::now()))
            .unwrap_or(false)
    }
}

/////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_then_open_ok_clears() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let open = registry.lookup_name("connection.open").unwrap();
        let open_ok = registry.lookup_name("connection.open-ok").unwrap();

        tracker.record_send(0, open, None).unwrap();
        assert!(tracker.pending(0).is_some());
        assert_eq!(
            ReceiveOutcome::Matched,
            tracker.record_receive(&registry, 0, open_ok).unwrap()
        );
        assert!(tracker.pending(0).is_none());
    }

    #[test]
    fn test_wrong_response_is_violation() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let open = registry.lookup_name("connection.open").unwrap();
        let delete_ok = registry.lookup_name("exchange.delete-ok").unwrap();

        tracker.record_send(1, open, None).unwrap();
        let err = tracker.record_receive(&registry, 1, delete_ok).unwrap_err();
        assert!(matches!(err, Error::SyncViolation(_)));
        assert_eq!(505, err.reply_code());
    }

    #[test]
    fn test_second_synchronous_send_is_violation() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let open = registry.lookup_name("connection.open").unwrap();
        let delete = registry.lookup_name("exchange.delete").unwrap();

        tracker.record_send(1, open, None).unwrap();
        assert!(tracker.record_send(1, delete, None).is_err());
        // other channels are independent
        tracker.record_send(2, delete, None).unwrap();
    }

    #[test]
    fn test_asynchronous_send_never_registers() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let publish = registry.lookup_name("basic.publish").unwrap();

        tracker.record_send(1, publish, None).unwrap();
        assert!(tracker.pending(1).is_none());
    }

    #[test]
    fn test_get_accepts_either_response() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let get = registry.lookup_name("basic.get").unwrap();
        let get_empty = registry.lookup_name("basic.get-empty").unwrap();

        tracker.record_send(1, get, None).unwrap();
        assert_eq!(
            ReceiveOutcome::Matched,
            tracker.record_receive(&registry, 1, get_empty).unwrap()
        );
    }

    #[test]
    fn test_unsolicited_response_rejected() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let delete_ok = registry.lookup_name("exchange.delete-ok").unwrap();

        let err = tracker.record_receive(&registry, 1, delete_ok).unwrap_err();
        assert!(matches!(err, Error::SyncViolation(_)));
    }

    #[test]
    fn test_unsolicited_deliver_passes() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let deliver = registry.lookup_name("basic.deliver").unwrap();

        assert_eq!(
            ReceiveOutcome::Unrelated,
            tracker.record_receive(&registry, 1, deliver).unwrap()
        );
    }

    #[test]
    fn test_channel_close_overrides_pending() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let delete = registry.lookup_name("exchange.delete").unwrap();
        let close = registry.lookup_name("channel.close").unwrap();

        tracker.record_send(1, delete, None).unwrap();
        assert_eq!(
            ReceiveOutcome::CloseOverride,
            tracker.record_receive(&registry, 1, close).unwrap()
        );
        assert!(tracker.pending(1).is_none());
    }

    #[test]
    fn test_connection_close_clears_all_channels() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let delete = registry.lookup_name("exchange.delete").unwrap();
        let conn_close = registry.lookup_name("connection.close").unwrap();

        tracker.record_send(1, delete, None).unwrap();
        tracker.record_send(2, delete, None).unwrap();
        assert_eq!(
            ReceiveOutcome::CloseOverride,
            tracker.record_receive(&registry, 0, conn_close).unwrap()
        );
        assert!(tracker.pending(1).is_none());
        assert!(tracker.pending(2).is_none());
    }

    #[test]
    fn test_abandon_clears_without_match() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let open = registry.lookup_name("connection.open").unwrap();

        tracker.record_send(0, open, Some(Duration::ZERO)).unwrap();
        assert!(tracker.expired(0));
        let abandoned = tracker.abandon(0).unwrap();
        assert_eq!(&MethodHeader::new(10, 40), abandoned.sent());
        assert!(tracker.pending(0).is_none());
        // channel is usable again
        tracker.record_send(0, open, None).unwrap();
    }

    #[test]
    fn test_no_deadline_never_expires() {
        let registry = MethodRegistry::new();
        let tracker = SyncTracker::new();
        let open = registry.lookup_name("connection.open").unwrap();

        tracker.record_send(0, open, None).unwrap();
        assert!(!tracker.expired(0));
    }
}
