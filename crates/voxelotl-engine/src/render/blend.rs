//! Blend modes and face culling.

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BlendMode {
    /// Opaque: blending disabled.
    #[default]
    None,
    Normal,
    Premultiplied,
    Additive,
    Screen,
    Multiply,
    Subtract,
}

impl BlendMode {
    /// `None` means the color target overwrites the destination.
    pub fn state(self) -> Option<wgpu::BlendState> {
        use wgpu::BlendFactor as F;
        use wgpu::BlendOperation as Op;

        let (src, dst, op) = match self {
            Self::None => return None,
            Self::Normal => (F::SrcAlpha, F::OneMinusSrcAlpha, Op::Add),
            Self::Premultiplied => (F::One, F::OneMinusSrcAlpha, Op::Add),
            Self::Additive => (F::SrcAlpha, F::One, Op::Add),
            Self::Screen => (F::One, F::OneMinusSrc, Op::Add),
            Self::Multiply => (F::Dst, F::One, Op::Add),
            Self::Subtract => (F::OneMinusSrcAlpha, F::One, Op::Subtract),
        };

        // Same function for color and alpha.
        let component = wgpu::BlendComponent {
            src_factor: src,
            dst_factor: dst,
            operation: op,
        };
        Some(wgpu::BlendState { color: component, alpha: component })
    }
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CullFace {
    #[default]
    None,
    Front,
    Back,
}

impl CullFace {
    pub fn face(self) -> Option<wgpu::Face> {
        match self {
            Self::None => None,
            Self::Front => Some(wgpu::Face::Front),
            Self::Back => Some(wgpu::Face::Back),
        }
    }
}
