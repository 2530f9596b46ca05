//! The closed SEL type table (spec §3).

use std::fmt;

/// A SEL type. Closed and monomorphic: there is no user extension point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Type {
    /// Only ever appears as the terminator of an argument-type list.
    Nil,
    Bool,
    Int,
    Uint,
    Float,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    Mat2,
    Mat3,
    Mat4,
    Str,
    Texture,
    /// Sentinel produced by a failed check; never a valid value type.
    Error,
}

impl Type {
    /// Size in bytes of a value of this type as it appears on the VM stack.
    pub const fn size(self) -> usize {
        match self {
            Type::Nil => 0,
            Type::Bool => 4, // pushed as a 4-byte int, per codegen contract
            Type::Int => 4,
            Type::Uint => 4,
            Type::Float => 4,
            Type::Vec2 => 8,
            Type::Vec3 => 12,
            Type::Vec4 => 16,
            Type::IVec2 => 8,
            Type::IVec3 => 12,
            Type::IVec4 => 16,
            Type::Mat2 => 16,
            Type::Mat3 => 36,
            Type::Mat4 => 64,
            Type::Str => 16, // pointer + length view
            Type::Texture => 16,
            Type::Error => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Type::Nil => "nil",
            Type::Bool => "bool",
            Type::Int => "int",
            Type::Uint => "uint",
            Type::Float => "float",
            Type::Vec2 => "vec2",
            Type::Vec3 => "vec3",
            Type::Vec4 => "vec4",
            Type::IVec2 => "ivec2",
            Type::IVec3 => "ivec3",
            Type::IVec4 => "ivec4",
            Type::Mat2 => "mat2",
            Type::Mat3 => "mat3",
            Type::Mat4 => "mat4",
            Type::Str => "str",
            Type::Texture => "texture",
            Type::Error => "<error>",
        }
    }

    /// `true` for `+ - * /`; matrices and integer vectors must go through named helpers instead.
    pub const fn supports_arithmetic(self) -> bool {
        matches!(
            self,
            Type::Int | Type::Uint | Type::Float | Type::Vec2 | Type::Vec3 | Type::Vec4
        )
    }

    pub const fn supports_remainder(self) -> bool {
        matches!(self, Type::Int | Type::Uint)
    }

    /// Inverse of the `repr(u8)` discriminant, used when decoding an opcode header's type byte.
    pub const fn from_u8(v: u8) -> Self {
        match v {
            0 => Type::Nil,
            1 => Type::Bool,
            2 => Type::Int,
            3 => Type::Uint,
            4 => Type::Float,
            5 => Type::Vec2,
            6 => Type::Vec3,
            7 => Type::Vec4,
            8 => Type::IVec2,
            9 => Type::IVec3,
            10 => Type::IVec4,
            11 => Type::Mat2,
            12 => Type::Mat3,
            13 => Type::Mat4,
            14 => Type::Str,
            15 => Type::Texture,
            _ => Type::Error,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A string view as it lives packed on the VM stack: pointer + length into session-owned bytes.
///
/// `ptr` is only ever dereferenced while the originating [`crate::vm::Vm`] call is on the stack;
/// the bytes it points to are owned by the session arena for the lifetime of the project.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct StrView {
    pub ptr: u64,
    pub len: u32,
    pub _pad: u32,
}

impl StrView {
    /// # Safety
    ///
    /// The caller must guarantee `s` outlives every use of the returned view.
    pub fn from_str(s: &str) -> Self {
        Self {
            ptr: s.as_ptr() as u64,
            len: s.len() as u32,
            _pad: 0,
        }
    }

    /// # Safety
    ///
    /// The caller must guarantee the bytes this view points to are still alive and still hold
    /// valid UTF-8.
    pub unsafe fn as_str<'a>(&self) -> &'a str {
        unsafe {
            let slice = std::slice::from_raw_parts(self.ptr as *const u8, self.len as usize);
            std::str::from_utf8_unchecked(slice)
        }
    }
}

/// Which frame of which shader's output (or which loaded image) a `texture`-typed value refers
/// to. 16-byte-equivalent record per spec §3, expressed as a tagged enum per DESIGN NOTES §9.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextureDescriptor {
    /// This frame's render target of shader `index`. Creates a scheduler dependency.
    CurrentOutputOf { index: u32 },
    /// Last frame's render target of shader `index`. Does not create a scheduler dependency.
    LastOutputOf { index: u32 },
    /// A decoded image loaded from disk, identified by its cache slot.
    LoadedImage { index: u32 },
    /// Resolution failed (unknown shader/file name, cache miss, ...); callers must check this
    /// before using the descriptor.
    Error,
}

impl TextureDescriptor {
    pub fn is_error(self) -> bool {
        matches!(self, TextureDescriptor::Error)
    }
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        TextureDescriptor::Error
    }
}

/// The wire form of [`TextureDescriptor`] as it lives on the VM stack: a plain-old-data struct so
/// it can sit in [`SelValue`]'s union and round-trip through [`bytemuck`], since a data-carrying
/// Rust enum cannot itself be `Pod`.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct TextureDescriptorRaw {
    kind: u32,
    index: u32,
    _pad: [u32; 2],
}

const TEX_KIND_CURRENT: u32 = 0;
const TEX_KIND_LAST: u32 = 1;
const TEX_KIND_IMAGE: u32 = 2;
const TEX_KIND_ERROR: u32 = 3;

impl From<TextureDescriptor> for TextureDescriptorRaw {
    fn from(descriptor: TextureDescriptor) -> Self {
        let (kind, index) = match descriptor {
            TextureDescriptor::CurrentOutputOf { index } => (TEX_KIND_CURRENT, index),
            TextureDescriptor::LastOutputOf { index } => (TEX_KIND_LAST, index),
            TextureDescriptor::LoadedImage { index } => (TEX_KIND_IMAGE, index),
            TextureDescriptor::Error => (TEX_KIND_ERROR, 0),
        };
        Self { kind, index, _pad: [0; 2] }
    }
}

impl From<TextureDescriptorRaw> for TextureDescriptor {
    fn from(raw: TextureDescriptorRaw) -> Self {
        match raw.kind {
            TEX_KIND_CURRENT => TextureDescriptor::CurrentOutputOf { index: raw.index },
            TEX_KIND_LAST => TextureDescriptor::LastOutputOf { index: raw.index },
            TEX_KIND_IMAGE => TextureDescriptor::LoadedImage { index: raw.index },
            _ => TextureDescriptor::Error,
        }
    }
}

/// A tagged-by-context union of every type-sized payload. Only meaningful alongside the [`Type`]
/// that was used to produce it.
#[derive(Copy, Clone)]
pub union SelValue {
    pub b: bool,
    pub i: i32,
    pub u: u32,
    pub f: f32,
    pub vec2: glam::Vec2,
    pub vec3: glam::Vec3,
    pub vec4: glam::Vec4,
    pub ivec2: glam::IVec2,
    pub ivec3: glam::IVec3,
    pub ivec4: glam::IVec4,
    pub mat2: glam::Mat2,
    pub mat3: glam::Mat3,
    pub mat4: glam::Mat4,
    pub str_view: StrView,
    pub texture: TextureDescriptorRaw,
}

impl SelValue {
    pub const fn nil() -> Self {
        Self { i: 0 }
    }

    /// Decodes exactly `ty.size()` bytes of `bytes` (the VM stack's on-wire layout) into a value.
    ///
    /// # Safety
    ///
    /// `bytes` must be at least `ty.size()` bytes long.
    pub unsafe fn from_bytes(ty: Type, bytes: &[u8]) -> Self {
        unsafe fn pod<T: bytemuck::Pod>(bytes: &[u8]) -> T {
            bytemuck::pod_read_unaligned(&bytes[..std::mem::size_of::<T>()])
        }
        unsafe {
            match ty {
                Type::Nil | Type::Error => SelValue::nil(),
                Type::Bool => SelValue { b: pod::<i32>(bytes) != 0 },
                Type::Int => SelValue { i: pod(bytes) },
                Type::Uint => SelValue { u: pod(bytes) },
                Type::Float => SelValue { f: pod(bytes) },
                Type::Vec2 => SelValue { vec2: pod(bytes) },
                Type::Vec3 => SelValue { vec3: pod(bytes) },
                Type::Vec4 => SelValue { vec4: pod(bytes) },
                Type::IVec2 => SelValue { ivec2: pod(bytes) },
                Type::IVec3 => SelValue { ivec3: pod(bytes) },
                Type::IVec4 => SelValue { ivec4: pod(bytes) },
                Type::Mat2 => SelValue { mat2: pod(bytes) },
                Type::Mat3 => SelValue { mat3: pod(bytes) },
                Type::Mat4 => SelValue { mat4: pod(bytes) },
                Type::Str => SelValue { str_view: pod(bytes) },
                Type::Texture => SelValue { texture: pod::<TextureDescriptorRaw>(bytes) },
            }
        }
    }

    /// Appends this value's `ty.size()`-byte wire representation to `out`.
    ///
    /// # Safety
    ///
    /// `ty` must be the type that was used to populate this value.
    pub unsafe fn write_bytes(&self, ty: Type, out: &mut Vec<u8>) {
        unsafe {
            match ty {
                Type::Nil | Type::Error => {}
                Type::Bool => out.extend_from_slice(&(self.b as i32).to_ne_bytes()),
                Type::Int => out.extend_from_slice(&self.i.to_ne_bytes()),
                Type::Uint => out.extend_from_slice(&self.u.to_ne_bytes()),
                Type::Float => out.extend_from_slice(&self.f.to_ne_bytes()),
                Type::Vec2 => out.extend_from_slice(bytemuck::bytes_of(&self.vec2)),
                Type::Vec3 => out.extend_from_slice(bytemuck::bytes_of(&self.vec3)),
                Type::Vec4 => out.extend_from_slice(bytemuck::bytes_of(&self.vec4)),
                Type::IVec2 => out.extend_from_slice(bytemuck::bytes_of(&self.ivec2)),
                Type::IVec3 => out.extend_from_slice(bytemuck::bytes_of(&self.ivec3)),
                Type::IVec4 => out.extend_from_slice(bytemuck::bytes_of(&self.ivec4)),
                Type::Mat2 => out.extend_from_slice(bytemuck::bytes_of(&self.mat2)),
                Type::Mat3 => out.extend_from_slice(bytemuck::bytes_of(&self.mat3)),
                Type::Mat4 => out.extend_from_slice(bytemuck::bytes_of(&self.mat4)),
                Type::Str => out.extend_from_slice(bytemuck::bytes_of(&self.str_view)),
                Type::Texture => {
                    out.extend_from_slice(bytemuck::bytes_of(&self.texture));
                }
            }
        }
    }

    /// # Safety
    ///
    /// `ty` must be the type that was used to populate this value.
    pub unsafe fn debug_fmt(&self, ty: Type) -> String {
        unsafe {
            match ty {
                Type::Nil | Type::Error => "<nil>".to_owned(),
                Type::Bool => format!("{}", self.b),
                Type::Int => format!("{}", self.i),
                Type::Uint => format!("{}", self.u),
                Type::Float => format!("{}", self.f),
                Type::Vec2 => format!("{}", self.vec2),
                Type::Vec3 => format!("{}", self.vec3),
                Type::Vec4 => format!("{}", self.vec4),
                Type::IVec2 => format!("{}", self.ivec2),
                Type::IVec3 => format!("{}", self.ivec3),
                Type::IVec4 => format!("{}", self.ivec4),
                Type::Mat2 => format!("{}", self.mat2),
                Type::Mat3 => format!("{}", self.mat3),
                Type::Mat4 => format!("{}", self.mat4),
                Type::Str => self.str_view.as_str().to_owned(),
                Type::Texture => format!("{:?}", TextureDescriptor::from(self.texture)),
            }
        }
    }
}

impl fmt::Debug for SelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SelValue(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_sizes_match_spec() {
        assert_eq!(Type::Nil.size(), 0);
        assert_eq!(Type::Bool.size(), 4);
        assert_eq!(Type::Int.size(), 4);
        assert_eq!(Type::Uint.size(), 4);
        assert_eq!(Type::Float.size(), 4);
        assert_eq!(Type::Vec2.size(), 8);
        assert_eq!(Type::Vec3.size(), 12);
        assert_eq!(Type::Vec4.size(), 16);
        assert_eq!(Type::IVec2.size(), 8);
        assert_eq!(Type::IVec3.size(), 12);
        assert_eq!(Type::IVec4.size(), 16);
        assert_eq!(Type::Mat2.size(), 16);
        assert_eq!(Type::Mat3.size(), 36);
        assert_eq!(Type::Mat4.size(), 64);
        assert_eq!(Type::Str.size(), 16);
        assert_eq!(Type::Texture.size(), 16);
    }

    #[test]
    fn arithmetic_support_excludes_matrices_and_ivecs() {
        assert!(Type::Float.supports_arithmetic());
        assert!(Type::Vec3.supports_arithmetic());
        assert!(!Type::Mat4.supports_arithmetic());
        assert!(!Type::IVec2.supports_arithmetic());
        assert!(!Type::Bool.supports_arithmetic());
        assert!(!Type::Str.supports_arithmetic());
        assert!(!Type::Texture.supports_arithmetic());
    }
}
