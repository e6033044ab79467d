//! Every variant's complete device program (generated header + body) must
//! compile, and its entry points must read exactly what the host binds.

use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};
use naga::{Binding, Module, ShaderStage, TypeInner};
use voxelotl_engine::layout::{wgsl, ContractVariant, Stage};
use voxelotl_engine::render::shader_source;

fn compile(variant: ContractVariant) -> (Module, ModuleInfo) {
    let source = shader_source(variant);
    let module = naga::front::wgsl::parse_str(&source)
        .unwrap_or_else(|e| panic!("{variant}: {}", e.emit_to_string(&source)));
    let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{variant}: {e:?}"));
    (module, info)
}

fn entry_point(module: &Module, stage: ShaderStage, name: &str) -> usize {
    module
        .entry_points
        .iter()
        .position(|ep| ep.stage == stage && ep.name == name)
        .unwrap_or_else(|| panic!("entry point {name} missing"))
}

// ── compilation ───────────────────────────────────────────────────────────

#[test]
fn every_program_validates() {
    for variant in ContractVariant::ALL {
        let (module, _) = compile(variant);
        entry_point(&module, ShaderStage::Vertex, "vs_main");
        entry_point(&module, ShaderStage::Fragment, "fs_main");
    }
}

// ── vertex inputs ─────────────────────────────────────────────────────────

#[test]
fn vs_main_takes_one_struct_per_vertex_buffer() {
    for variant in ContractVariant::ALL {
        let desc = variant.desc();
        let (module, _) = compile(variant);
        let vs = &module.entry_points[entry_point(&module, ShaderStage::Vertex, "vs_main")];
        let buffers = desc.vertex_attributes();

        assert_eq!(vs.function.arguments.len(), buffers.len(), "{variant}");
        for (arg, buffer) in vs.function.arguments.iter().zip(&buffers) {
            let ty = &module.types[arg.ty];
            assert_eq!(
                ty.name.as_deref(),
                Some(wgsl::attribute_struct_name(buffer.slot.layout).as_str()),
                "{variant}: argument {:?}",
                arg.name
            );
            let TypeInner::Struct { members, .. } = &ty.inner else {
                panic!("{variant}: argument {:?} is not a struct", arg.name);
            };
            let locations: Vec<u32> = members
                .iter()
                .map(|m| match &m.binding {
                    Some(Binding::Location { location, .. }) => *location,
                    other => panic!("{variant}: member {:?} bound as {other:?}", m.name),
                })
                .collect();
            let expected: Vec<u32> = buffer.attributes.iter().map(|a| a.location).collect();
            assert_eq!(locations, expected, "{variant}");
        }
    }
}

// ── uniforms ──────────────────────────────────────────────────────────────

#[test]
fn each_stage_reads_its_own_uniforms() {
    for variant in ContractVariant::ALL {
        let desc = variant.desc();
        let (module, info) = compile(variant);

        for slot in desc.uniform_slots() {
            let name = slot.device_name();
            let (handle, global) = module
                .global_variables
                .iter()
                .find(|(_, g)| g.name.as_deref() == Some(name.as_str()))
                .unwrap_or_else(|| panic!("{variant}: {name} missing"));
            let binding = global.binding.as_ref().expect("uniform without binding");
            assert_eq!((binding.group, binding.binding), (slot.stage.group(), slot.index), "{variant}: {name}");

            let (stage, entry) = match slot.stage {
                Stage::Vertex => (ShaderStage::Vertex, "vs_main"),
                Stage::Fragment => (ShaderStage::Fragment, "fs_main"),
            };
            let uses = info.get_entry_point(entry_point(&module, stage, entry))[handle];
            assert!(!uses.is_empty(), "{variant}: {entry} never reads {name}");
        }
    }
}

#[test]
fn debug_program_binds_nothing_in_group_one() {
    let (module, _) = compile(ContractVariant::DebugSolid);
    let group_one = module
        .global_variables
        .iter()
        .filter_map(|(_, g)| g.binding.as_ref())
        .filter(|b| b.group == Stage::Fragment.group())
        .count();
    assert_eq!(group_one, 0);
}

// ── textures ──────────────────────────────────────────────────────────────

#[test]
fn overlay_fragment_samples_its_texture() {
    let desc = ContractVariant::Ui2d.desc();
    let (module, info) = compile(ContractVariant::Ui2d);
    let fs = info.get_entry_point(entry_point(&module, ShaderStage::Fragment, "fs_main"));

    let group_one: Vec<_> = module
        .global_variables
        .iter()
        .filter(|(_, g)| g.binding.as_ref().is_some_and(|b| b.group == Stage::Fragment.group()))
        .collect();
    assert_eq!(group_one.len(), desc.fragment_resources.len());

    for resource in desc.fragment_resources {
        let name = resource.device_name();
        let (handle, _) = group_one
            .iter()
            .find(|(_, g)| g.name.as_deref() == Some(name.as_str()))
            .unwrap_or_else(|| panic!("{name} missing"));
        assert!(!fs[*handle].is_empty(), "fs_main never reads {name}");
    }
}
