//! Stable identifiers for humanoids and the viewers they are shown to.

use core::fmt;

use sha2::{Digest, Sha256};

/// Runtime id of an entity within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a connected viewer (a player session).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewerId(pub u64);

/// Name-based UUID (version 3 layout) identifying a humanoid to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityUuid([u8; 16]);

impl EntityUuid {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Derives a UUID from the entity id, skin payload and display name.
    ///
    /// The same inputs always produce the same UUID.
    pub fn derive(entity: EntityId, skin: &[u8], name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(entity.0.to_string().as_bytes());
        hasher.update(skin);
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        bytes[6] = (bytes[6] & 0x0f) | 0x30;
        bytes[8] = (bytes[8] & 0x3f) | 0x80;
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    pub const fn version(&self) -> u8 {
        self.0[6] >> 4
    }
}

impl fmt::Display for EntityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if matches!(i, 4 | 6 | 8 | 10) {
                f.write_str("-")?;
            }
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_uuid_is_stable_and_versioned() {
        let skin = vec![7u8; 8192];
        let a = EntityUuid::derive(EntityId(42), &skin, "Steve");
        let b = EntityUuid::derive(EntityId(42), &skin, "Steve");
        let c = EntityUuid::derive(EntityId(43), &skin, "Steve");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.version(), 3);
        assert_eq!(a.as_bytes()[8] & 0xc0, 0x80);
    }

    #[test]
    fn display_matches_hex_layout() {
        let uuid = EntityUuid::from_bytes([
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ]);
        let text = uuid.to_string();
        assert_eq!(text, "00112233-4455-6677-8899-aabbccddeeff");
        assert_eq!(text.replace('-', ""), hex::encode(uuid.as_bytes()));
    }
}
