//! Several flip cards on one screen.
//!
//! The deck hit-tests pointer downs against each card's bounds (last
//! inserted is topmost) and keeps the pointer captured by that card until it
//! lifts, so a drag that wanders over a neighbour keeps flipping the card it
//! started on.

use flipdeck_core::*;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use web_time::Duration;

use crate::flip_card::{FlipCard, FlipOutcome};

new_key_type! {
    pub struct CardKey;
}

struct Slot<C> {
    card: FlipCard<C>,
    bounds: Rect,
}

pub struct FlipDeck<C> {
    cards: SlotMap<CardKey, Slot<C>>,
    /// Paint order; the last entry is on top.
    order: Vec<CardKey>,
    captures: SmallVec<[(PointerId, CardKey); 2]>,
}

impl<C> Default for FlipDeck<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FlipDeck<C> {
    pub fn new() -> Self {
        Self {
            cards: SlotMap::with_key(),
            order: Vec::new(),
            captures: SmallVec::new(),
        }
    }

    pub fn insert(&mut self, card: FlipCard<C>, bounds: Rect) -> CardKey {
        let key = self.cards.insert(Slot { card, bounds });
        self.order.push(key);
        key
    }

    pub fn remove(&mut self, key: CardKey) -> Option<FlipCard<C>> {
        self.order.retain(|k| *k != key);
        self.captures.retain(|(_, k)| *k != key);
        self.cards.remove(key).map(|slot| slot.card)
    }

    pub fn get(&self, key: CardKey) -> Option<&FlipCard<C>> {
        self.cards.get(key).map(|slot| &slot.card)
    }

    pub fn bounds(&self, key: CardKey) -> Option<Rect> {
        self.cards.get(key).map(|slot| slot.bounds)
    }

    pub fn set_bounds(&mut self, key: CardKey, bounds: Rect) {
        if let Some(slot) = self.cards.get_mut(key) {
            slot.bounds = bounds;
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards in paint order.
    pub fn iter(&self) -> impl Iterator<Item = (CardKey, &FlipCard<C>, Rect)> {
        self.order.iter().filter_map(|&key| {
            self.cards
                .get(key)
                .map(|slot| (key, &slot.card, slot.bounds))
        })
    }

    /// Topmost card whose bounds contain `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<CardKey> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&key| self.cards.get(key).is_some_and(|s| s.bounds.contains(p)))
    }

    /// Routes a pointer event; returns the card that received it and what it did.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<(CardKey, Vec<FlipOutcome>)> {
        let key = match event.event {
            PointerEventKind::Down(_) => {
                if self.captured_by(event.id).is_some() {
                    log::warn!("pointer {:?} went down twice; keeping capture", event.id);
                    return None;
                }
                let key = self.hit_test(event.position)?;
                if self.cards[key].card.is_tracking_pointer() {
                    return None;
                }
                self.captures.push((event.id, key));
                key
            }
            _ => self.captured_by(event.id)?,
        };

        if matches!(
            event.event,
            PointerEventKind::Up(_) | PointerEventKind::Cancel
        ) {
            self.captures.retain(|(id, _)| *id != event.id);
        }

        let Some(slot) = self.cards.get(key) else {
            log::warn!("pointer {:?} captured by a removed card", event.id);
            return None;
        };
        Some((key, slot.card.handle_pointer(event)))
    }

    /// Advances every card; returns true while any is still animating.
    pub fn tick(&self, dt: Duration) -> bool {
        self.cards
            .values()
            .fold(false, |animating, slot| slot.card.tick(dt) | animating)
    }

    fn captured_by(&self, id: PointerId) -> Option<CardKey> {
        self.captures
            .iter()
            .find(|(pointer, _)| *pointer == id)
            .map(|(_, key)| *key)
    }
}
