//! Codec implementations, factory and payload-type registry

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::types::{CodecType, PayloadDecoder};

// Codec implementations
#[cfg(feature = "g711")]
pub mod g711;

#[cfg(feature = "l16")]
pub mod l16;

/// Codec factory for creating decoder instances
pub struct CodecFactory;

impl CodecFactory {
    /// Create a decoder of the given type bound to `payload_type`
    #[allow(unreachable_patterns)]
    pub fn create(codec_type: CodecType, payload_type: u8) -> Result<Box<dyn PayloadDecoder>> {
        match codec_type {
            #[cfg(feature = "g711")]
            CodecType::G711Pcmu => Ok(Box::new(g711::G711Decoder::pcmu(payload_type))),

            #[cfg(feature = "g711")]
            CodecType::G711Pcma => Ok(Box::new(g711::G711Decoder::pcma(payload_type))),

            #[cfg(feature = "l16")]
            CodecType::L16 => Ok(Box::new(l16::L16Decoder::new(
                payload_type,
                codec_type.default_sample_rate(),
            ))),

            codec_type => Err(CodecError::unsupported_codec(format!(
                "{} not enabled in build features",
                codec_type.name()
            ))),
        }
    }

    /// Create a decoder by codec name, bound to a (usually dynamic) payload type
    pub fn create_by_name(name: &str, payload_type: u8) -> Result<Box<dyn PayloadDecoder>> {
        Self::create(CodecType::from_name(name)?, payload_type)
    }

    /// Create a decoder for an RFC 3551 static payload type
    pub fn create_by_payload_type(payload_type: u8) -> Result<Box<dyn PayloadDecoder>> {
        let codec_type = CodecType::from_static_payload_type(payload_type)
            .ok_or(CodecError::UnsupportedPayloadType { payload_type })?;
        Self::create(codec_type, payload_type)
    }

    /// Get all supported codec names
    pub fn supported_codecs() -> Vec<&'static str> {
        crate::SUPPORTED_CODECS.to_vec()
    }

    /// Check if a codec is supported
    pub fn is_supported(name: &str) -> bool {
        Self::supported_codecs().contains(&name.to_ascii_uppercase().as_str())
    }
}

/// Registry mapping payload types to decoders
///
/// Lookups for unknown payload types return `None`; deciding what to do
/// with such packets is up to the caller.
pub struct CodecRegistry {
    decoders: HashMap<u8, Box<dyn PayloadDecoder>>,
}

impl CodecRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Create a registry holding a decoder for every enabled static payload type
    pub fn with_static_payload_types() -> Self {
        let mut registry = Self::new();
        for codec_type in [CodecType::G711Pcmu, CodecType::G711Pcma, CodecType::L16] {
            let payload_type = codec_type.static_payload_type();
            if let Ok(decoder) = CodecFactory::create(codec_type, payload_type) {
                registry.register(payload_type, decoder);
            }
        }
        registry
    }

    /// Bind a decoder to a payload type, returning the one it replaces
    pub fn register(
        &mut self,
        payload_type: u8,
        decoder: Box<dyn PayloadDecoder>,
    ) -> Option<Box<dyn PayloadDecoder>> {
        debug!("Registering {} for payload type {}", decoder.info().name, payload_type);
        self.decoders.insert(payload_type, decoder)
    }

    /// Bind a codec, by name, to a payload type
    pub fn register_by_name(&mut self, payload_type: u8, name: &str) -> Result<()> {
        let decoder = CodecFactory::create_by_name(name, payload_type)?;
        self.register(payload_type, decoder);
        Ok(())
    }

    /// Resolve a payload type to its decoder
    pub fn resolve(&mut self, payload_type: u8) -> Option<&mut Box<dyn PayloadDecoder>> {
        self.decoders.get_mut(&payload_type)
    }

    /// Check whether a payload type has a decoder
    pub fn contains(&self, payload_type: u8) -> bool {
        self.decoders.contains_key(&payload_type)
    }

    /// Remove the decoder bound to a payload type
    pub fn remove(&mut self, payload_type: u8) -> Option<Box<dyn PayloadDecoder>> {
        self.decoders.remove(&payload_type)
    }

    /// List registered payload types in ascending order
    pub fn payload_types(&self) -> Vec<u8> {
        let mut types: Vec<u8> = self.decoders.keys().copied().collect();
        types.sort_unstable();
        types
    }

    /// Reset the state of every registered decoder
    pub fn reset_all(&mut self) {
        for decoder in self.decoders.values_mut() {
            decoder.reset();
        }
    }

    /// Get the count of registered decoders
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_static_payload_types()
    }
}

impl fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for payload_type in self.payload_types() {
            map.entry(&payload_type, &self.decoders[&payload_type].info().name);
        }
        map.finish()
    }
}
