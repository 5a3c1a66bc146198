//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{RoomId, error::ValueObjectError};

/// Characters a generated room code is drawn from (base 36, lowercase).
const ROOM_CODE_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a generated room code.
const ROOM_CODE_LENGTH: usize = 6;

/// Factory for generating room codes.
///
/// Codes are short, human-typeable and collision-resistant enough for
/// casual use; uniqueness is not enforced anywhere.
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// Generate a new random 6-character base-36 room code.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<RoomId, ValueObjectError> {
        let mut rng = rand::rng();
        let code: String = (0..ROOM_CODE_LENGTH)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect();
        RoomId::new(code)
    }
}
