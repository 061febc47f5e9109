//! Outbound messages that make a humanoid visible to viewers.
//!
//! Encoding and delivery belong to the protocol layer behind [`Broadcaster`].

use crate::attribute::AttributeSnapshot;
use crate::body::Pose;
use crate::config::HumanoidConfig;
use crate::identity::{EntityId, EntityUuid, ViewerId};
use crate::inventory::ItemStack;

/// Everything a viewer needs to render a humanoid the first time.
#[derive(Clone, Debug, PartialEq)]
pub struct AddPlayer {
    pub uuid: EntityUuid,
    pub username: String,
    pub entity: EntityId,
    pub pose: Pose,
    pub held_item: ItemStack,
    pub attributes: AttributeSnapshot,
}

/// Player list entry advertising a humanoid's skin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerListEntry {
    pub uuid: EntityUuid,
    pub entity: EntityId,
    pub name: String,
    pub skin_id: String,
    pub skin_data: Vec<u8>,
}

/// Delivery channel to connected viewers.
pub trait Broadcaster {
    fn add_player_list(&mut self, viewer: ViewerId, entry: &PlayerListEntry);

    fn remove_player_list(&mut self, viewer: ViewerId, uuid: EntityUuid);

    fn add_player(&mut self, viewer: ViewerId, packet: &AddPlayer);

    fn armor_contents(
        &mut self,
        viewer: ViewerId,
        entity: EntityId,
        armor: &[ItemStack; HumanoidConfig::ARMOR_SLOTS],
    );
}

/// Message recorded by [`RecordingBroadcaster`].
#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    PlayerListAdd(ViewerId, PlayerListEntry),
    PlayerListRemove(ViewerId, EntityUuid),
    AddPlayer(ViewerId, AddPlayer),
    Armor(ViewerId, EntityId, [ItemStack; HumanoidConfig::ARMOR_SLOTS]),
}

/// Broadcaster that keeps every message in order, for tooling and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingBroadcaster {
    pub sent: Vec<Sent>,
}

impl Broadcaster for RecordingBroadcaster {
    fn add_player_list(&mut self, viewer: ViewerId, entry: &PlayerListEntry) {
        self.sent.push(Sent::PlayerListAdd(viewer, entry.clone()));
    }

    fn remove_player_list(&mut self, viewer: ViewerId, uuid: EntityUuid) {
        self.sent.push(Sent::PlayerListRemove(viewer, uuid));
    }

    fn add_player(&mut self, viewer: ViewerId, packet: &AddPlayer) {
        self.sent.push(Sent::AddPlayer(viewer, packet.clone()));
    }

    fn armor_contents(
        &mut self,
        viewer: ViewerId,
        entity: EntityId,
        armor: &[ItemStack; HumanoidConfig::ARMOR_SLOTS],
    ) {
        self.sent.push(Sent::Armor(viewer, entity, *armor));
    }
}
