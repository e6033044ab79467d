// Declaration macros. Each contract struct and slot enum is written once and
// both the Rust type and its static descriptor come out of that declaration.

/// Declares a `#[repr(C)]` Pod layout struct and its [`LayoutDesc`].
///
/// ```ignore
/// layout! {
///     pub struct Vertex2D: Vertex {
///         pub position: F32x2,
///         pub tex_coord: F32x2,
///         pub color: F32x4,
///     }
/// }
/// ```
///
/// A compile-time assertion rejects any layout with hidden padding.
///
/// [`LayoutDesc`]: crate::layout::LayoutDesc
macro_rules! layout {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $kind:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field: $ty, )*
        }

        impl $crate::layout::Layout for $name {
            const DESC: $crate::layout::LayoutDesc = $crate::layout::LayoutDesc {
                name: stringify!($name),
                kind: $crate::layout::LayoutKind::$kind,
                size: ::std::mem::size_of::<$name>(),
                align: ::std::mem::align_of::<$name>(),
                fields: &[$(
                    $crate::layout::Field {
                        name: stringify!($field),
                        kind: <$ty as $crate::primitive::Primitive>::KIND,
                        offset: ::std::mem::offset_of!($name, $field),
                    },
                )*],
            };
        }

        const _: () = <$name as $crate::layout::Layout>::DESC.assert_dense();
    };
}

/// Declares a stage's slot enum and the slot table derived from it.
///
/// ```ignore
/// slots! {
///     pub enum VertexSlot in Vertex {
///         Vertices = 0 => VertexBuffer(ShaderVertex),
///         Uniforms = 1 => Uniform(VertexShaderUniforms),
///     }
///     table VERTEX_SLOTS;
/// }
/// ```
macro_rules! slots {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $stage:ident {
            $( $(#[$vmeta:meta])* $slot:ident = $index:literal => $binding:ident($layout:ty) ),+ $(,)?
        }
        table $table:ident;
    ) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $slot = $index, )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$slot),+];
            pub const STAGE: $crate::slot::Stage = $crate::slot::Stage::$stage;

            /// Slot number shared by the host binding call and the device declaration.
            #[inline]
            pub const fn index(self) -> u32 {
                self as u32
            }

            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$slot => stringify!($slot), )+
                }
            }

            pub const fn desc(self) -> &'static $crate::slot::SlotDesc {
                &$table[self as usize]
            }
        }

        $vis const $table: &[$crate::slot::SlotDesc] = &[$(
            $crate::slot::SlotDesc {
                stage: $crate::slot::Stage::$stage,
                index: $index,
                name: stringify!($slot),
                binding: $crate::slot::SlotBinding::$binding,
                layout: &<$layout as $crate::layout::Layout>::DESC,
            },
        )+];

        const _: () = $crate::slot::assert_dense_slots($table);
    };
}

/// Declares a stage's resource enum and its table.
///
/// ```ignore
/// resources! {
///     pub enum FragmentResource in Fragment {
///         Texture = 0 => Texture2D,
///         Sampler = 1 => Sampler,
///     }
///     table FRAGMENT_RESOURCES;
/// }
/// ```
macro_rules! resources {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $stage:ident {
            $( $(#[$vmeta:meta])* $slot:ident = $index:literal => $kind:ident ),+ $(,)?
        }
        table $table:ident;
    ) => {
        $(#[$meta])*
        #[repr(u32)]
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $slot = $index, )+
        }

        impl $name {
            pub const ALL: &'static [Self] = &[$(Self::$slot),+];
            pub const STAGE: $crate::slot::Stage = $crate::slot::Stage::$stage;

            #[inline]
            pub const fn index(self) -> u32 {
                self as u32
            }

            pub const fn desc(self) -> &'static $crate::slot::ResourceDesc {
                &$table[(self as u32 - $table[0].index) as usize]
            }
        }

        $vis const $table: &[$crate::slot::ResourceDesc] = &[$(
            $crate::slot::ResourceDesc {
                stage: $crate::slot::Stage::$stage,
                index: $index,
                name: stringify!($slot),
                kind: $crate::slot::ResourceKind::$kind,
            },
        )+];

        const _: () = $crate::slot::assert_consecutive_resources($table);
    };
}
