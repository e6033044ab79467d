//! Compiles every generated header with naga and compares what the device
//! compiler reports against the host descriptors.

use naga::{AddressSpace, Binding, Module, StructMember, TypeInner};
use voxelotl_layout::{wgsl, ContractDesc, ContractVariant, LayoutDesc, PrimitiveKind, ResourceKind, Stage};

fn compile(desc: &ContractDesc) -> Module {
    let source = wgsl::header(desc);
    let module = naga::front::wgsl::parse_str(&source)
        .unwrap_or_else(|e| panic!("{}: {}\n{source}", desc.variant, e.emit_to_string(&source)));
    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::empty())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{}: {e:?}", desc.variant));
    module
}

fn struct_members<'m>(module: &'m Module, name: &str) -> (&'m [StructMember], u32) {
    module
        .types
        .iter()
        .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
            (Some(n), TypeInner::Struct { members, span }) if n == name => Some((members.as_slice(), *span)),
            _ => None,
        })
        .unwrap_or_else(|| panic!("struct {name} missing from device module"))
}

fn member_offset(members: &[StructMember], name: &str) -> u32 {
    members
        .iter()
        .find(|m| m.name.as_deref() == Some(name))
        .map(|m| m.offset)
        .unwrap_or_else(|| panic!("member {name} missing"))
}

fn check_struct(module: &Module, layout: &LayoutDesc) {
    let (members, span) = struct_members(module, layout.name);
    assert_eq!(span as usize, layout.size, "{} span", layout.name);

    for field in layout.fields {
        let offset = field.offset as u32;
        match field.kind {
            PrimitiveKind::F32x3 => {
                assert_eq!(member_offset(members, field.name), offset, "{}.{}", layout.name, field.name);
                let w = format!("{}_w", field.name);
                assert_eq!(member_offset(members, &w), offset + 12, "{}.{w}", layout.name);
            }
            PrimitiveKind::Pad(1) => {
                assert_eq!(member_offset(members, field.name), offset, "{}.{}", layout.name, field.name);
            }
            PrimitiveKind::Pad(words) => {
                for i in 0..words {
                    let word = format!("{}_{i}", field.name);
                    assert_eq!(member_offset(members, &word), offset + 4 * i, "{}.{word}", layout.name);
                }
            }
            _ => assert_eq!(member_offset(members, field.name), offset, "{}.{}", layout.name, field.name),
        }
    }
}

#[test]
fn struct_spans_and_offsets_match_host() {
    for variant in ContractVariant::ALL {
        let desc = variant.desc();
        let module = compile(desc);
        for layout in desc.layouts() {
            check_struct(&module, layout);
        }
    }
}

#[test]
fn uniform_globals_sit_at_declared_slots() {
    for variant in ContractVariant::ALL {
        let desc = variant.desc();
        let module = compile(desc);
        for slot in desc.uniform_slots() {
            let name = slot.device_name();
            let (_, global) = module
                .global_variables
                .iter()
                .find(|(_, g)| g.name.as_deref() == Some(name.as_str()))
                .unwrap_or_else(|| panic!("{variant}: global {name} missing"));
            assert_eq!(global.space, AddressSpace::Uniform);
            let binding = global.binding.as_ref().expect("uniform without binding");
            assert_eq!(binding.group, slot.stage.group(), "{variant}: {name}");
            assert_eq!(binding.binding, slot.index, "{variant}: {name}");
            assert_eq!(module.types[global.ty].name.as_deref(), Some(slot.layout.name));
        }
    }
}

#[test]
fn attribute_locations_match_host() {
    for variant in ContractVariant::ALL {
        let desc = variant.desc();
        let module = compile(desc);
        for buffer in desc.vertex_attributes() {
            let (members, _) = struct_members(&module, &wgsl::attribute_struct_name(buffer.slot.layout));
            assert_eq!(members.len(), buffer.attributes.len());
            for (member, attr) in members.iter().zip(&buffer.attributes) {
                assert_eq!(member.name.as_deref(), Some(attr.name.as_str()));
                match &member.binding {
                    Some(Binding::Location { location, .. }) => {
                        assert_eq!(*location, attr.location, "{variant}: {}", attr.name)
                    }
                    other => panic!("{variant}: {} bound as {other:?}", attr.name),
                }
            }
        }
    }
}

#[test]
fn fragment_stage_reads_group_one() {
    let module = compile(ContractVariant::PhongU8.desc());
    let fragment: Vec<_> = module
        .global_variables
        .iter()
        .filter_map(|(_, g)| g.binding.as_ref())
        .filter(|b| b.group == Stage::Fragment.group())
        .collect();
    assert_eq!(fragment.len(), 1);
    assert_eq!(fragment[0].binding, 0);
}

#[test]
fn overlay_resources_reflect_as_texture_and_sampler() {
    let desc = ContractVariant::Ui2d.desc();
    let module = compile(desc);
    for resource in desc.fragment_resources {
        let name = resource.device_name();
        let global = module
            .global_variables
            .iter()
            .map(|(_, g)| g)
            .find(|g| g.name.as_deref() == Some(name.as_str()))
            .unwrap_or_else(|| panic!("{name} missing"));
        let binding = global.binding.as_ref().expect("resource without binding");
        assert_eq!((binding.group, binding.binding), (Stage::Fragment.group(), resource.index));
        match (resource.kind, &module.types[global.ty].inner) {
            (ResourceKind::Texture2D, TypeInner::Image { dim, arrayed, .. }) => {
                assert_eq!(*dim, naga::ImageDimension::D2);
                assert!(!arrayed);
            }
            (ResourceKind::Sampler, TypeInner::Sampler { comparison }) => assert!(!comparison),
            (kind, other) => panic!("{name}: {kind:?} reflected as {other:?}"),
        }
    }
}

