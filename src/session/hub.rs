//! Buzzer Hub
//!
//! Fan-out of buzzer events to running sessions, plus the keyboard
//! fallback used when no USB buzzers are attached.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;

use crate::game::buzzer::{BuzzerButton, BuzzerEvent, BuzzerId};

/// Fan-out source of buzzer events.
///
/// Each subscriber gets its own unbounded queue, so every event published
/// reaches every live subscriber in publish order, however many arrive
/// between two ticks.
#[derive(Debug, Clone, Default)]
pub struct BuzzerHub {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<BuzzerEvent>>>>,
}

impl BuzzerHub {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// New subscription starting at the next published event.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<BuzzerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers().push(tx);
        rx
    }

    /// Publish an event. Returns `false` if nobody is listening.
    pub fn publish(&self, event: BuzzerEvent) -> bool {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| tx.send(event).is_ok());
        let receivers = subscribers.len();
        debug!(receivers, ?event, "buzzer event published");
        receivers > 0
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }

    fn subscribers(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<BuzzerEvent>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keyboard keys standing in for buzzer buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    keys: BTreeMap<char, (BuzzerId, BuzzerButton)>,
}

impl Default for KeyBindings {
    /// Left hand for buzzer 0, right hand for buzzer 1. `q` and `p` are
    /// the red buttons.
    fn default() -> Self {
        let mut bindings = Self { keys: BTreeMap::new() };
        let layout = [
            (BuzzerId(0), ['q', 'w', 'e', 'r', 't']),
            (BuzzerId(1), ['p', 'o', 'i', 'u', 'z']),
        ];
        let buttons = [
            BuzzerButton::Red,
            BuzzerButton::Blue,
            BuzzerButton::Orange,
            BuzzerButton::Green,
            BuzzerButton::Yellow,
        ];
        for (buzzer, keys) in layout {
            for (key, button) in keys.into_iter().zip(buttons) {
                bindings.bind(key, buzzer, button);
            }
        }
        bindings
    }
}

impl KeyBindings {
    /// No keys bound.
    pub fn empty() -> Self {
        Self { keys: BTreeMap::new() }
    }

    /// Bind a key (case-insensitive).
    pub fn bind(&mut self, key: char, buzzer: BuzzerId, button: BuzzerButton) {
        self.keys.insert(key.to_ascii_lowercase(), (buzzer, button));
    }

    /// Button bound to a key.
    pub fn lookup(&self, key: char) -> Option<(BuzzerId, BuzzerButton)> {
        self.keys.get(&key.to_ascii_lowercase()).copied()
    }

    /// Turn a typed line into press/release pairs, one per bound key.
    pub fn events_for_line(&self, line: &str) -> Vec<BuzzerEvent> {
        line.chars()
            .filter_map(|c| self.lookup(c))
            .flat_map(|(buzzer, button)| {
                [BuzzerEvent::press(buzzer, button), BuzzerEvent::release(buzzer, button)]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::buzzer::ButtonAction;

    #[test]
    fn test_default_red_keys() {
        let keys = KeyBindings::default();
        assert_eq!(keys.lookup('q'), Some((BuzzerId(0), BuzzerButton::Red)));
        assert_eq!(keys.lookup('P'), Some((BuzzerId(1), BuzzerButton::Red)));
        assert_eq!(keys.lookup('t'), Some((BuzzerId(0), BuzzerButton::Yellow)));
        assert_eq!(keys.lookup('x'), None);
    }

    #[test]
    fn test_events_for_line() {
        let keys = KeyBindings::default();
        let events = keys.events_for_line("qq x p");
        assert_eq!(events.len(), 6);
        assert!(events[0].is_red_press());
        assert_eq!(events[1].action, ButtonAction::Released);
        assert_eq!(events[4], BuzzerEvent::red_press(BuzzerId(1)));
    }

    #[tokio::test]
    async fn test_hub_fans_out_in_order() {
        let hub = BuzzerHub::new();
        assert!(!hub.publish(BuzzerEvent::red_press(BuzzerId(0))));

        let mut a = hub.subscribe();
        let mut b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.publish(BuzzerEvent::red_press(BuzzerId(0)));
        hub.publish(BuzzerEvent::red_press(BuzzerId(1)));

        for rx in [&mut a, &mut b] {
            assert_eq!(rx.recv().await.unwrap().buzzer, BuzzerId(0));
            assert_eq!(rx.recv().await.unwrap().buzzer, BuzzerId(1));
        }
    }

    #[tokio::test]
    async fn test_hub_keeps_every_event_of_a_burst() {
        let hub = BuzzerHub::new();
        let mut rx = hub.subscribe();

        let events = KeyBindings::default().events_for_line(&"q".repeat(1000));
        for event in &events {
            assert!(hub.publish(*event));
        }

        let mut received = 0;
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event, events[received]);
            received += 1;
        }
        assert_eq!(received, 2000);
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let hub = BuzzerHub::new();
        let rx = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 1);
        drop(rx);
        assert!(!hub.publish(BuzzerEvent::red_press(BuzzerId(0))));
        assert_eq!(hub.subscriber_count(), 0);
    }
}
