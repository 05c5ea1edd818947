use std::collections::HashMap;

use packed_struct::{
    PackedStructSlice,
    PackingResult,
};

use super::{
    flyc,
    general,
    ChipRebootResponse,
    ParamDefinition,
    ParamDefinitionRequest,
    ParamListEnd,
    Payload,
    RoutingKey,
    VersionInquiryResponse,
};

/// Outcome of looking a payload up in the catalog.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Resolution {
    Known(Payload),

    /// No catalog entry for this routing key.
    UnrecognizedCommand,

    /// The key is known but the payload fits none of its shapes.
    UnrecognizedPayloadShape,
}

impl Resolution {
    #[inline]
    pub fn known(self) -> Option<Payload> {
        match self {
            Resolution::Known(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Copy, Clone)]
enum Shape {
    /// Needs at least `size` bytes; anything past them is ignored.
    Fixed {
        size:   usize,
        unpack: fn(&[u8]) -> PackingResult<Payload>,
    },

    /// Shape decided by the payload itself.
    Variable(fn(&[u8]) -> PackingResult<Option<Payload>>),
}

#[derive(Copy, Clone)]
pub struct Entry {
    pub name: &'static str,
    shape:    Shape,
}

impl Entry {
    /// Smallest payload any shape of this entry accepts.
    pub fn min_size(&self) -> usize {
        match self.shape {
            Shape::Fixed {
                size, ..
            } => size,
            Shape::Variable(_) => 1,
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("min_size", &self.min_size())
            .finish()
    }
}

lazy_static::lazy_static! {
    static ref CATALOG: HashMap<RoutingKey, Entry> = {
        let mut m = HashMap::new();

        m.insert(general::VERSION_INQUIRY, Entry {
            name:  "version inquiry response",
            shape: Shape::Fixed {
                size:   VersionInquiryResponse::SIZE,
                unpack: |b| {
                    VersionInquiryResponse::unpack_from_slice(b).map(Payload::VersionInquiry)
                },
            },
        });

        m.insert(general::CHIP_REBOOT, Entry {
            name:  "chip reboot response",
            shape: Shape::Fixed {
                size:   1,
                unpack: |b| ChipRebootResponse::unpack_from_slice(b).map(Payload::ChipReboot),
            },
        });

        m.insert(flyc::PARAM_DEFINITION_REQUEST, Entry {
            name:  "get param definition request",
            shape: Shape::Fixed {
                size:   2,
                unpack: |b| {
                    ParamDefinitionRequest::unpack_from_slice(b)
                        .map(Payload::ParamDefinitionRequest)
                },
            },
        });

        m.insert(flyc::PARAM_DEFINITION, Entry {
            name:  "get param definition response",
            shape: Shape::Variable(param_definition),
        });

        m
    };
}

fn param_definition(payload: &[u8]) -> PackingResult<Option<Payload>> {
    if let Some(def) = ParamDefinition::from_partial(payload)? {
        return Ok(Some(Payload::ParamDefinition(def)));
    }

    match payload.first() {
        Some(&status) => Ok(Some(Payload::ParamListEnd(ParamListEnd {
            status,
        }))),
        None => Ok(None),
    }
}

#[inline]
pub fn lookup(key: &RoutingKey) -> Option<&'static Entry> {
    CATALOG.get(key)
}

pub fn entries() -> impl Iterator<Item = (&'static RoutingKey, &'static Entry)> {
    CATALOG.iter()
}

/// Identifies the record `payload` holds, given the routing fields of its header.
#[tracing::instrument(skip(payload), fields(payload.len = payload.len()), level = "debug")]
pub fn resolve(key: RoutingKey, payload: &[u8]) -> Resolution {
    let entry = match lookup(&key) {
        Some(entry) => entry,
        None => return Resolution::UnrecognizedCommand,
    };

    let result = match entry.shape {
        Shape::Fixed {
            size,
            unpack,
        } if payload.len() >= size => unpack(&payload[..size]).map(Some),
        Shape::Fixed {
            ..
        } => Ok(None),
        Shape::Variable(unpack) => unpack(payload),
    };

    match result {
        Ok(Some(p)) => Resolution::Known(p),
        Ok(None) => {
            tracing::debug!(entry = entry.name, "payload too short for any known shape");
            Resolution::UnrecognizedPayloadShape
        },
        Err(e) => {
            tracing::warn!(entry = entry.name, error = %e, "failed to unpack payload");
            Resolution::UnrecognizedPayloadShape
        },
    }
}
