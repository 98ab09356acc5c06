use merlin::Transcript;

/// Identity binding absorbed into the proof transcript.
///
/// A proof made under one context does not verify under any other, so a
/// proof presented by one registered key cannot be replayed by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProofContext {
    namespace: Option<[u8; 32]>,
}

impl ProofContext {
    /// No identity binding.
    pub const ANONYMOUS: Self = Self { namespace: None };

    /// Bind to a 32-byte identity namespace.
    pub fn bound(namespace: [u8; 32]) -> Self {
        Self {
            namespace: Some(namespace),
        }
    }

    pub fn namespace(&self) -> Option<&[u8; 32]> {
        self.namespace.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.namespace.is_none()
    }

    pub(crate) fn append_to(&self, transcript: &mut Transcript) {
        match &self.namespace {
            None => transcript.append_message(b"context", &[0x00]),
            Some(ns) => {
                transcript.append_message(b"context", &[0x01]);
                transcript.append_message(b"namespace", ns);
            }
        }
    }
}
