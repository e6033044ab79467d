//! Vertex attribute locations derived from the vertex-buffer slots.

use crate::primitive::PrimitiveKind;
use crate::slot::SlotDesc;
use crate::variant::ContractDesc;

/// One `@location(n)` input of the vertex stage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AttributeDesc {
    pub location: u32,
    /// Byte offset inside the record.
    pub offset: usize,
    /// Per-column kind: matrices are split into `f32x4` columns.
    pub kind: PrimitiveKind,
    pub name: String,
}

/// Attributes read from one vertex-buffer slot.
#[derive(Debug, Clone)]
pub struct VertexBufferDesc {
    pub slot: &'static SlotDesc,
    pub attributes: Vec<AttributeDesc>,
}

impl VertexBufferDesc {
    #[inline]
    pub fn stride(&self) -> usize {
        self.slot.layout.size
    }
}

impl ContractDesc {
    /// Assigns locations in slot order: vertex record first, then instance.
    ///
    /// A matrix takes four consecutive locations (`model_0` .. `model_3`);
    /// padding takes none.
    pub fn vertex_attributes(&self) -> Vec<VertexBufferDesc> {
        let mut location = 0;
        self.vertex_buffer_slots()
            .map(|slot| {
                let mut attributes = Vec::new();
                for field in slot.layout.data_fields() {
                    let columns = field.kind.attribute_columns();
                    for c in 0..columns {
                        let name = if columns > 1 {
                            format!("{}_{c}", field.name)
                        } else {
                            field.name.to_owned()
                        };
                        attributes.push(AttributeDesc {
                            location,
                            offset: field.offset + c as usize * field.kind.column_kind().size(),
                            kind: field.kind.column_kind(),
                            name,
                        });
                        location += 1;
                    }
                }
                VertexBufferDesc { slot, attributes }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::variant::ContractVariant;

    use super::*;

    fn locations(buffer: &VertexBufferDesc) -> Vec<(u32, &str, usize)> {
        buffer
            .attributes
            .iter()
            .map(|a| (a.location, a.name.as_str(), a.offset))
            .collect()
    }

    #[test]
    fn instance_attributes_follow_vertex_attributes() {
        let buffers = ContractVariant::PhongF32.desc().vertex_attributes();
        assert_eq!(buffers.len(), 2);
        assert_eq!(
            locations(&buffers[0]),
            [(0, "position", 0), (1, "normal", 16), (2, "color", 32), (3, "tex_coord", 48)]
        );
        assert_eq!(
            locations(&buffers[1]),
            [
                (4, "model_0", 0),
                (5, "model_1", 16),
                (6, "model_2", 32),
                (7, "model_3", 48),
                (8, "normal_model_0", 64),
                (9, "normal_model_1", 80),
                (10, "normal_model_2", 96),
                (11, "normal_model_3", 112),
                (12, "color", 128),
            ]
        );
    }

    #[test]
    fn padding_takes_no_location() {
        let buffers = ContractVariant::PhongU8.desc().vertex_attributes();
        let vertex = &buffers[0];
        assert_eq!(vertex.attributes.len(), 4);
        assert_eq!(vertex.attributes[3].name, "tex_coord");
        assert_eq!(vertex.attributes[3].offset, 40);
        assert_eq!(vertex.attributes[2].kind, PrimitiveKind::U8x4);
    }

    #[test]
    fn buffers_follow_slot_indices() {
        for v in ContractVariant::ALL {
            for (i, buffer) in v.desc().vertex_attributes().iter().enumerate() {
                assert_eq!(buffer.slot.index as usize, i, "{v}");
                assert_eq!(buffer.stride(), buffer.slot.layout.size);
            }
        }
    }

    #[test]
    fn ui_has_one_buffer() {
        let buffers = ContractVariant::Ui2d.desc().vertex_attributes();
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].attributes.len(), 3);
    }
}
