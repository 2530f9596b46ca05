//! The built-in registry (spec §4.6): named constants and functions, with purity and a native
//! implementation for each. Grounded on the original `src/builtins.h` table (`BUILTIN_CONSTANTS`,
//! `BUILTIN_FUNCTIONS`) — extended here to the full category list §4.6 names, since the original
//! only demonstrates a handful of entries per category.

use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};
use noise::{NoiseFn, Perlin};

use crate::host::HostContext;
use crate::types::{SelValue, StrView, Type};

/// Sequential reader over a packed argument record (spec §4.5's "native function contract").
pub struct ArgReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ArgReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn read<T: bytemuck::Pod>(&mut self) -> T {
        let size = std::mem::size_of::<T>();
        let value = bytemuck::pod_read_unaligned(&self.bytes[self.offset..self.offset + size]);
        self.offset += size;
        value
    }

    pub fn f32(&mut self) -> f32 {
        self.read()
    }

    pub fn i32(&mut self) -> i32 {
        self.read()
    }

    pub fn u32(&mut self) -> u32 {
        self.read()
    }

    /// `bool` is packed as a 4-byte int (spec §4.4).
    pub fn bool(&mut self) -> bool {
        self.read::<i32>() != 0
    }

    pub fn vec2(&mut self) -> Vec2 {
        self.read()
    }

    pub fn vec3(&mut self) -> Vec3 {
        self.read()
    }

    pub fn vec4(&mut self) -> Vec4 {
        self.read()
    }

    pub fn ivec2(&mut self) -> IVec2 {
        self.read()
    }

    pub fn ivec3(&mut self) -> IVec3 {
        self.read()
    }

    pub fn ivec4(&mut self) -> IVec4 {
        self.read()
    }

    pub fn mat2(&mut self) -> Mat2 {
        self.read()
    }

    pub fn mat3(&mut self) -> Mat3 {
        self.read()
    }

    pub fn mat4(&mut self) -> Mat4 {
        self.read()
    }

    /// # Safety
    ///
    /// The session arena backing this view must still be alive.
    pub fn str(&mut self) -> &'a str {
        let view: StrView = self.read();
        unsafe { view.as_str() }
    }
}

pub type NativeFn = fn(&mut dyn HostContext, &mut ArgReader) -> SelValue;

pub struct BuiltinFn {
    pub name: &'static str,
    pub result: Type,
    pub args: &'static [Type],
    pub pure_: bool,
    pub doc: &'static str,
    pub call: NativeFn,
}

pub struct BuiltinConst {
    pub name: &'static str,
    pub ty: Type,
    pub value: f32,
}

pub const CONSTANTS: &[BuiltinConst] = &[
    BuiltinConst { name: "PI", ty: Type::Float, value: std::f32::consts::PI },
    BuiltinConst { name: "TAU", ty: Type::Float, value: std::f32::consts::TAU },
    BuiltinConst { name: "PHI", ty: Type::Float, value: 1.618_034 },
    BuiltinConst { name: "e", ty: Type::Float, value: std::f32::consts::E },
];

pub fn find_const(name: &str) -> Option<&'static BuiltinConst> {
    CONSTANTS.iter().find(|c| c.name == name)
}

pub fn find_func(name: &str) -> Option<(u32, &'static BuiltinFn)> {
    FUNCTIONS.iter().position(|f| f.name == name).map(|i| (i as u32, &FUNCTIONS[i]))
}

pub fn func_by_index(index: u32) -> &'static BuiltinFn {
    &FUNCTIONS[index as usize]
}

// --- type conversions --------------------------------------------------------------------

fn native_int(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { i: a.f32() as i32 }
}

fn native_float(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.i32() as f32 }
}

fn native_unsigned(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { u: a.i32() as u32 }
}

fn native_signed(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { i: a.u32() as i32 }
}

// --- host state (impure) ------------------------------------------------------------------

fn native_time(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { f: h.time() }
}

fn native_deltatime(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { f: h.deltatime() }
}

fn native_frame_count(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { u: h.frame_count() }
}

fn native_iota(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { u: h.iota() }
}

fn native_rand(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let min = a.f32();
    let max = a.f32();
    SelValue { f: h.rand(min, max) }
}

fn native_randi(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let min = a.i32();
    let max = a.i32();
    SelValue { i: h.randi(min, max) }
}

fn native_aspect_ratio(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { f: h.aspect_ratio() }
}

fn native_iresolution(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { ivec2: h.iresolution() }
}

fn native_mouse_position(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { vec2: h.mouse_position() }
}

fn native_mouse_drag_position(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { vec2: h.mouse_drag_position() }
}

fn native_left_mouse_button_is_down(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { b: h.left_mouse_button_is_down() }
}

fn native_left_mouse_button_was_clicked(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { b: h.left_mouse_button_was_clicked() }
}

fn native_right_mouse_button_is_down(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { b: h.right_mouse_button_is_down() }
}

fn native_right_mouse_button_was_clicked(h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { b: h.right_mouse_button_was_clicked() }
}

fn native_key_is_down(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let key = a.str();
    SelValue { b: h.key_is_down(key) }
}

fn native_key_was_pressed(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let key = a.str();
    SelValue { b: h.key_was_pressed(key) }
}

// --- pure math -----------------------------------------------------------------------------

macro_rules! unary_f32 {
    ($fn_name:ident, $op:expr) => {
        fn $fn_name(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
            let x = a.f32();
            SelValue { f: $op(x) }
        }
    };
}

macro_rules! binary_f32 {
    ($fn_name:ident, $op:expr) => {
        fn $fn_name(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
            let x = a.f32();
            let y = a.f32();
            SelValue { f: $op(x, y) }
        }
    };
}

unary_f32!(native_sqrt, f32::sqrt);
unary_f32!(native_exp, f32::exp);
unary_f32!(native_log, f32::ln);
unary_f32!(native_exp2, f32::exp2);
unary_f32!(native_log2, f32::log2);
unary_f32!(native_sin, f32::sin);
unary_f32!(native_cos, f32::cos);
unary_f32!(native_tan, f32::tan);
unary_f32!(native_asin, f32::asin);
unary_f32!(native_acos, f32::acos);
unary_f32!(native_atan, f32::atan);
unary_f32!(native_round, f32::round);
unary_f32!(native_floor, f32::floor);
unary_f32!(native_ceil, f32::ceil);
unary_f32!(native_fract, f32::fract);

binary_f32!(native_pow, f32::powf);
binary_f32!(native_atan2, f32::atan2);
binary_f32!(native_min, f32::min);
binary_f32!(native_max, f32::max);

fn native_clamp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let min = a.f32();
    let max = a.f32();
    let x = a.f32();
    SelValue { f: x.clamp(min, max) }
}

fn native_lerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.f32();
    let y = a.f32();
    let t = a.f32();
    SelValue { f: x + (y - x) * t }
}

fn native_ilerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.f32();
    let y = a.f32();
    let v = a.f32();
    SelValue { f: (v - x) / (y - x) }
}

fn native_remap(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let in_min = a.f32();
    let in_max = a.f32();
    let out_min = a.f32();
    let out_max = a.f32();
    let x = a.f32();
    let t = (x - in_min) / (in_max - in_min);
    SelValue { f: out_min + (out_max - out_min) * t }
}

fn native_lerpsmooth(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.f32();
    let y = a.f32();
    let dt = a.f32();
    let omega = a.f32();
    SelValue { f: y + (x - y) * (-dt / omega).exp2() }
}

fn native_smoothstep(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let t = a.f32().clamp(0.0, 1.0);
    SelValue { f: t * t * (3.0 - 2.0 * t) }
}

fn native_radians(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.f32().to_radians() }
}

fn native_perlin3d(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.f32();
    let y = a.f32();
    let z = a.f32();
    let perlin = Perlin::new(0);
    let value = perlin.get([x as f64, y as f64, z as f64]);
    SelValue { f: value as f32 }
}

fn native_xor(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let y = a.u32();
    SelValue { u: x ^ y }
}

fn native_and(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let y = a.u32();
    SelValue { u: x & y }
}

fn native_or(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let y = a.u32();
    SelValue { u: x | y }
}

fn native_not(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { u: !a.u32() }
}

fn native_lshift(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let n = a.u32();
    SelValue { u: x << (n & 31) }
}

fn native_rshift(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let n = a.u32();
    SelValue { u: x >> (n & 31) }
}

fn native_rol(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let n = a.u32();
    SelValue { u: x.rotate_left(n) }
}

fn native_ror(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.u32();
    let n = a.u32();
    SelValue { u: x.rotate_right(n) }
}

fn native_mini(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.i32();
    let y = a.i32();
    SelValue { i: x.min(y) }
}

fn native_maxi(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.i32();
    let y = a.i32();
    SelValue { i: x.max(y) }
}

// --- constructors and vector/matrix helpers -------------------------------------------------

fn native_vec2(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec2: Vec2::new(a.f32(), a.f32()) }
}

fn native_vec3(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec3: Vec3::new(a.f32(), a.f32(), a.f32()) }
}

fn native_vec4(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec4: Vec4::new(a.f32(), a.f32(), a.f32(), a.f32()) }
}

fn native_ivec2(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { ivec2: IVec2::new(a.i32(), a.i32()) }
}

fn native_ivec3(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { ivec3: IVec3::new(a.i32(), a.i32(), a.i32()) }
}

fn native_ivec4(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { ivec4: IVec4::new(a.i32(), a.i32(), a.i32(), a.i32()) }
}

fn native_mat2(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { mat2: Mat2::from_cols(a.vec2(), a.vec2()) }
}

fn native_mat3(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { mat3: Mat3::from_cols(a.vec3(), a.vec3(), a.vec3()) }
}

fn native_mat4(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { mat4: Mat4::from_cols(a.vec4(), a.vec4(), a.vec4(), a.vec4()) }
}

fn native_mat2_id(_h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { mat2: Mat2::IDENTITY }
}

fn native_mat3_id(_h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { mat3: Mat3::IDENTITY }
}

fn native_mat4_id(_h: &mut dyn HostContext, _a: &mut ArgReader) -> SelValue {
    SelValue { mat4: Mat4::IDENTITY }
}

fn native_vec2_from_polar(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let angle = a.f32();
    let radius = a.f32();
    SelValue { vec2: Vec2::new(radius * angle.cos(), radius * angle.sin()) }
}

fn native_vec3_from_spherical(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let theta = a.f32();
    let phi = a.f32();
    let radius = a.f32();
    let (st, ct) = theta.sin_cos();
    let (sp, cp) = phi.sin_cos();
    SelValue { vec3: Vec3::new(radius * st * cp, radius * ct, radius * st * sp) }
}

fn native_vec2_distance(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec2().distance(a.vec2()) }
}

fn native_vec2_length(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec2().length() }
}

fn native_vec2_normalize(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec2: a.vec2().normalize() }
}

fn native_vec2_dot(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec2();
    let y = a.vec2();
    SelValue { f: x.dot(y) }
}

fn native_vec2_mul_scalar(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let v = a.vec2();
    let s = a.f32();
    SelValue { vec2: v * s }
}

fn native_vec2_lerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec2();
    let y = a.vec2();
    let t = a.f32();
    SelValue { vec2: x.lerp(y, t) }
}

fn native_vec2_slerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec2();
    let y = a.vec2();
    let t = a.f32();
    SelValue { vec2: slerp2(x, y, t) }
}

fn native_vec3_distance(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec3().distance(a.vec3()) }
}

fn native_vec3_length(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec3().length() }
}

fn native_vec3_normalize(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec3: a.vec3().normalize() }
}

fn native_vec3_dot(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec3();
    let y = a.vec3();
    SelValue { f: x.dot(y) }
}

fn native_vec3_mul_scalar(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let v = a.vec3();
    let s = a.f32();
    SelValue { vec3: v * s }
}

fn native_vec3_lerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec3();
    let y = a.vec3();
    let t = a.f32();
    SelValue { vec3: x.lerp(y, t) }
}

fn native_vec3_slerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec3();
    let y = a.vec3();
    let t = a.f32();
    SelValue { vec3: slerp3(x, y, t) }
}

fn native_vec3_cross(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec3();
    let y = a.vec3();
    SelValue { vec3: x.cross(y) }
}

fn native_vec4_distance(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec4().distance(a.vec4()) }
}

fn native_vec4_length(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { f: a.vec4().length() }
}

fn native_vec4_normalize(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec4: a.vec4().normalize() }
}

fn native_vec4_dot(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec4();
    let y = a.vec4();
    SelValue { f: x.dot(y) }
}

fn native_vec4_mul_scalar(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let v = a.vec4();
    let s = a.f32();
    SelValue { vec4: v * s }
}

fn native_vec4_lerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec4();
    let y = a.vec4();
    let t = a.f32();
    SelValue { vec4: x.lerp(y, t) }
}

fn native_vec4_slerp(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.vec4();
    let y = a.vec4();
    let t = a.f32();
    SelValue { vec4: slerp4(x, y, t) }
}

fn native_vec4_xyz(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { vec3: a.vec4().truncate() }
}

/// Spherical linear interpolation between two directions, generic over `glam` vector types that
/// expose `length`/`normalize`/`dot` (vec2/vec3/vec4 all do); falls back to ordinary `lerp` when
/// the vectors are (near-)parallel, where slerp's angle-based formula is numerically unstable.
fn slerp2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    slerp_generic(a, b, t, Vec2::dot, Vec2::length, Vec2::lerp)
}

fn slerp3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    slerp_generic(a, b, t, Vec3::dot, Vec3::length, Vec3::lerp)
}

fn slerp4(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    slerp_generic(a, b, t, Vec4::dot, Vec4::length, Vec4::lerp)
}

fn slerp_generic<V: Copy + std::ops::Mul<f32, Output = V> + std::ops::Add<V, Output = V>>(
    a: V,
    b: V,
    t: f32,
    dot: fn(V, V) -> f32,
    length: fn(V) -> f32,
    lerp: fn(V, V, f32) -> V,
) -> V {
    let (len_a, len_b) = (length(a), length(b));
    if len_a < f32::EPSILON || len_b < f32::EPSILON {
        return lerp(a, b, t);
    }
    let cos_theta = (dot(a, b) / (len_a * len_b)).clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    if theta.abs() < 1e-4 {
        return lerp(a, b, t);
    }
    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    a * wa + b * wb
}

fn native_rgba(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let hex = a.i32() as u32;
    let r = ((hex >> 24) & 0xFF) as f32 / 255.0;
    let g = ((hex >> 16) & 0xFF) as f32 / 255.0;
    let b = ((hex >> 8) & 0xFF) as f32 / 255.0;
    let alpha = (hex & 0xFF) as f32 / 255.0;
    SelValue { vec4: Vec4::new(r, g, b, alpha) }
}

fn native_mat4_make_scale(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { mat4: Mat4::from_scale(a.vec3()) }
}

fn native_mat4_make_rotation(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let axis = a.vec3();
    let angle = a.f32();
    SelValue { mat4: Mat4::from_axis_angle(axis, angle) }
}

fn native_mat4_make_translation(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    SelValue { mat4: Mat4::from_translation(a.vec3()) }
}

fn native_mat4_make_look_at(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let eye = a.vec3();
    let center = a.vec3();
    let up = a.vec3();
    SelValue { mat4: Mat4::look_at_rh(eye, center, up) }
}

fn native_mat4_scale(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let m = a.mat4();
    let s = a.vec3();
    SelValue { mat4: m * Mat4::from_scale(s) }
}

fn native_mat4_rotate(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let m = a.mat4();
    let axis = a.vec3();
    let angle = a.f32();
    SelValue { mat4: m * Mat4::from_axis_angle(axis, angle) }
}

fn native_mat4_translate(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let m = a.mat4();
    let t = a.vec3();
    SelValue { mat4: m * Mat4::from_translation(t) }
}

fn native_mat4_mul_mat4(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let x = a.mat4();
    let y = a.mat4();
    SelValue { mat4: x * y }
}

fn native_mat4_mul_vec4(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let m = a.mat4();
    let v = a.vec4();
    SelValue { vec4: m * v }
}

fn native_mat4_mul_scalar(_h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let m = a.mat4();
    let s = a.f32();
    SelValue { mat4: m * s }
}

// --- texture -------------------------------------------------------------------------------

fn native_load_image(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let path = a.str();
    SelValue { texture: h.load_image(path).into() }
}

fn native_output_of(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let name = a.str();
    SelValue { texture: h.output_of(name).into() }
}

fn native_last_output_of(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let name = a.str();
    SelValue { texture: h.last_output_of(name).into() }
}

// --- GUI widgets (impure) -------------------------------------------------------------------

fn native_input_float(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.f32();
    SelValue { f: h.input_float(label, default) }
}

fn native_input_int(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.i32();
    SelValue { i: h.input_int(label, default) }
}

fn native_input_vec2(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.vec2();
    SelValue { vec2: h.input_vec2(label, default) }
}

fn native_input_vec3(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.vec3();
    SelValue { vec3: h.input_vec3(label, default) }
}

fn native_input_vec4(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.vec4();
    SelValue { vec4: h.input_vec4(label, default) }
}

fn native_checkbox(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.bool();
    SelValue { b: h.checkbox(label, default) }
}

fn native_drag_int(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let min = a.i32();
    let max = a.i32();
    let default = a.i32();
    SelValue { i: h.drag_int(label, min, max, default) }
}

fn native_slider_float(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let min = a.f32();
    let max = a.f32();
    let default = a.f32();
    SelValue { f: h.slider_float(label, min, max, default) }
}

fn native_slider_float_log(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let min = a.f32();
    let max = a.f32();
    let default = a.f32();
    SelValue { f: h.slider_float_log(label, min, max, default) }
}

fn native_color_picker(h: &mut dyn HostContext, a: &mut ArgReader) -> SelValue {
    let label = a.str();
    let default = a.vec4();
    SelValue { vec4: h.color_picker(label, default) }
}

use Type::*;

macro_rules! f {
    ($name:expr, $result:expr, [$($arg:expr),* $(,)?], $pure:expr, $doc:expr, $call:expr) => {
        BuiltinFn { name: $name, result: $result, args: &[$($arg),*], pure_: $pure, doc: $doc, call: $call }
    };
}

pub const FUNCTIONS: &[BuiltinFn] = &[
    // type conversions
    f!("int", Int, [Float], true, "Truncates a float to int.", native_int),
    f!("float", Float, [Int], true, "Widens an int to float.", native_float),
    f!("unsigned", Uint, [Int], true, "Reinterprets an int's bits as uint.", native_unsigned),
    f!("signed", Int, [Uint], true, "Reinterprets a uint's bits as int.", native_signed),
    // host state (impure)
    f!("time", Float, [], false, "Seconds since the session started.", native_time),
    f!("deltatime", Float, [], false, "Seconds since the previous frame.", native_deltatime),
    f!("frame_count", Uint, [], false, "Number of frames rendered so far.", native_frame_count),
    f!("iota", Uint, [], false, "Monotonic call counter, not reset on reload.", native_iota),
    f!("rand", Float, [Float, Float], false, "Uniform random float in [min, max].", native_rand),
    f!("randi", Int, [Int, Int], false, "Uniform random int in [min, max].", native_randi),
    f!("aspect_ratio", Float, [], false, "Viewport width divided by height.", native_aspect_ratio),
    f!("iresolution", IVec2, [], false, "Viewport resolution in pixels.", native_iresolution),
    f!("mouse_position", Vec2, [], false, "Current mouse position in pixels.", native_mouse_position),
    f!("mouse_drag_position", Vec2, [], false, "Mouse position at drag start.", native_mouse_drag_position),
    f!("left_mouse_button_is_down", Bool, [], false, "Left button held this frame.", native_left_mouse_button_is_down),
    f!("left_mouse_button_was_clicked", Bool, [], false, "Left button clicked this frame.", native_left_mouse_button_was_clicked),
    f!("right_mouse_button_is_down", Bool, [], false, "Right button held this frame.", native_right_mouse_button_is_down),
    f!("right_mouse_button_was_clicked", Bool, [], false, "Right button clicked this frame.", native_right_mouse_button_was_clicked),
    f!("key_is_down", Bool, [Str], false, "Whether the named key is held.", native_key_is_down),
    f!("key_was_pressed", Bool, [Str], false, "Whether the named key was pressed this frame.", native_key_was_pressed),
    // pure math
    f!("sqrt", Float, [Float], true, "Square root.", native_sqrt),
    f!("pow", Float, [Float, Float], true, "x raised to the y.", native_pow),
    f!("exp", Float, [Float], true, "e^x.", native_exp),
    f!("log", Float, [Float], true, "Natural logarithm.", native_log),
    f!("exp2", Float, [Float], true, "2^x.", native_exp2),
    f!("log2", Float, [Float], true, "Base-2 logarithm.", native_log2),
    f!("sin", Float, [Float], true, "Sine.", native_sin),
    f!("cos", Float, [Float], true, "Cosine.", native_cos),
    f!("tan", Float, [Float], true, "Tangent.", native_tan),
    f!("asin", Float, [Float], true, "Arcsine.", native_asin),
    f!("acos", Float, [Float], true, "Arccosine.", native_acos),
    f!("atan", Float, [Float], true, "Arctangent.", native_atan),
    f!("atan2", Float, [Float, Float], true, "Two-argument arctangent.", native_atan2),
    f!("round", Float, [Float], true, "Rounds to nearest.", native_round),
    f!("floor", Float, [Float], true, "Rounds down.", native_floor),
    f!("ceil", Float, [Float], true, "Rounds up.", native_ceil),
    f!("fract", Float, [Float], true, "Fractional part.", native_fract),
    f!("min", Float, [Float, Float], true, "Smaller of a and b.", native_min),
    f!("max", Float, [Float, Float], true, "Larger of a and b.", native_max),
    f!("clamp", Float, [Float, Float, Float], true, "Clamps x to [min, max].", native_clamp),
    f!("lerp", Float, [Float, Float, Float], true, "Linear interpolation.", native_lerp),
    f!("ilerp", Float, [Float, Float, Float], true, "Inverse linear interpolation.", native_ilerp),
    f!("remap", Float, [Float, Float, Float, Float, Float], true, "Remaps x from one range to another.", native_remap),
    f!("lerpsmooth", Float, [Float, Float, Float, Float], true, "Framerate-independent smoothing.", native_lerpsmooth),
    f!("smoothstep", Float, [Float], true, "Smoothed Hermite interpolation of t in [0, 1].", native_smoothstep),
    f!("radians", Float, [Float], true, "Converts degrees to radians.", native_radians),
    f!("perlin3D", Float, [Float, Float, Float], true, "3D Perlin noise.", native_perlin3d),
    f!("xor", Uint, [Uint, Uint], true, "Bitwise xor.", native_xor),
    f!("and", Uint, [Uint, Uint], true, "Bitwise and.", native_and),
    f!("or", Uint, [Uint, Uint], true, "Bitwise or.", native_or),
    f!("not", Uint, [Uint], true, "Bitwise not.", native_not),
    f!("lshift", Uint, [Uint, Uint], true, "Logical shift left.", native_lshift),
    f!("rshift", Uint, [Uint, Uint], true, "Logical shift right.", native_rshift),
    f!("rol", Uint, [Uint, Uint], true, "Bitwise rotate left.", native_rol),
    f!("ror", Uint, [Uint, Uint], true, "Bitwise rotate right.", native_ror),
    f!("mini", Int, [Int, Int], true, "Smaller of a and b.", native_mini),
    f!("maxi", Int, [Int, Int], true, "Larger of a and b.", native_maxi),
    // constructors and vector/matrix helpers
    f!("vec2", Vec2, [Float, Float], true, "Constructs a vec2.", native_vec2),
    f!("vec3", Vec3, [Float, Float, Float], true, "Constructs a vec3.", native_vec3),
    f!("vec4", Vec4, [Float, Float, Float, Float], true, "Constructs a vec4.", native_vec4),
    f!("ivec2", IVec2, [Int, Int], true, "Constructs an ivec2.", native_ivec2),
    f!("ivec3", IVec3, [Int, Int, Int], true, "Constructs an ivec3.", native_ivec3),
    f!("ivec4", IVec4, [Int, Int, Int, Int], true, "Constructs an ivec4.", native_ivec4),
    f!("mat2", Mat2, [Vec2, Vec2], true, "Constructs a mat2 from columns.", native_mat2),
    f!("mat3", Mat3, [Vec3, Vec3, Vec3], true, "Constructs a mat3 from columns.", native_mat3),
    f!("mat4", Mat4, [Vec4, Vec4, Vec4, Vec4], true, "Constructs a mat4 from columns.", native_mat4),
    f!("mat2_id", Mat2, [], true, "The 2x2 identity matrix.", native_mat2_id),
    f!("mat3_id", Mat3, [], true, "The 3x3 identity matrix.", native_mat3_id),
    f!("mat4_id", Mat4, [], true, "The 4x4 identity matrix.", native_mat4_id),
    f!("vec2_from_polar", Vec2, [Float, Float], true, "vec2 from angle and radius.", native_vec2_from_polar),
    f!("vec3_from_spherical", Vec3, [Float, Float, Float], true, "vec3 from spherical coordinates.", native_vec3_from_spherical),
    f!("vec2_distance", Float, [Vec2, Vec2], true, "Distance between two vec2s.", native_vec2_distance),
    f!("vec2_length", Float, [Vec2], true, "Length of a vec2.", native_vec2_length),
    f!("vec2_normalize", Vec2, [Vec2], true, "Unit-length vec2.", native_vec2_normalize),
    f!("vec2_dot", Float, [Vec2, Vec2], true, "Dot product.", native_vec2_dot),
    f!("vec2_mul_scalar", Vec2, [Vec2, Float], true, "Scales a vec2.", native_vec2_mul_scalar),
    f!("vec2_lerp", Vec2, [Vec2, Vec2, Float], true, "Linear interpolation between two vec2s.", native_vec2_lerp),
    f!("vec2_slerp", Vec2, [Vec2, Vec2, Float], true, "Spherical linear interpolation between two vec2s.", native_vec2_slerp),
    f!("vec3_distance", Float, [Vec3, Vec3], true, "Distance between two vec3s.", native_vec3_distance),
    f!("vec3_length", Float, [Vec3], true, "Length of a vec3.", native_vec3_length),
    f!("vec3_normalize", Vec3, [Vec3], true, "Unit-length vec3.", native_vec3_normalize),
    f!("vec3_dot", Float, [Vec3, Vec3], true, "Dot product.", native_vec3_dot),
    f!("vec3_mul_scalar", Vec3, [Vec3, Float], true, "Scales a vec3.", native_vec3_mul_scalar),
    f!("vec3_lerp", Vec3, [Vec3, Vec3, Float], true, "Linear interpolation between two vec3s.", native_vec3_lerp),
    f!("vec3_slerp", Vec3, [Vec3, Vec3, Float], true, "Spherical linear interpolation between two vec3s.", native_vec3_slerp),
    f!("vec3_cross", Vec3, [Vec3, Vec3], true, "Cross product.", native_vec3_cross),
    f!("vec4_distance", Float, [Vec4, Vec4], true, "Distance between two vec4s.", native_vec4_distance),
    f!("vec4_length", Float, [Vec4], true, "Length of a vec4.", native_vec4_length),
    f!("vec4_normalize", Vec4, [Vec4], true, "Unit-length vec4.", native_vec4_normalize),
    f!("vec4_dot", Float, [Vec4, Vec4], true, "Dot product.", native_vec4_dot),
    f!("vec4_mul_scalar", Vec4, [Vec4, Float], true, "Scales a vec4.", native_vec4_mul_scalar),
    f!("vec4_lerp", Vec4, [Vec4, Vec4, Float], true, "Linear interpolation between two vec4s.", native_vec4_lerp),
    f!("vec4_slerp", Vec4, [Vec4, Vec4, Float], true, "Spherical linear interpolation between two vec4s.", native_vec4_slerp),
    f!("vec4_xyz", Vec3, [Vec4], true, "Drops a vec4's w component.", native_vec4_xyz),
    f!("rgba", Vec4, [Int], true, "Unpacks a 0xRRGGBBAA hex literal into a vec4.", native_rgba),
    f!("mat4_make_scale", Mat4, [Vec3], true, "Scale matrix.", native_mat4_make_scale),
    f!("mat4_make_rotation", Mat4, [Vec3, Float], true, "Rotation matrix about an axis.", native_mat4_make_rotation),
    f!("mat4_make_translation", Mat4, [Vec3], true, "Translation matrix.", native_mat4_make_translation),
    f!("mat4_make_look_at", Mat4, [Vec3, Vec3, Vec3], true, "Right-handed look-at view matrix.", native_mat4_make_look_at),
    f!("mat4_scale", Mat4, [Mat4, Vec3], true, "Post-multiplies by a scale matrix.", native_mat4_scale),
    f!("mat4_rotate", Mat4, [Mat4, Vec3, Float], true, "Post-multiplies by a rotation matrix.", native_mat4_rotate),
    f!("mat4_translate", Mat4, [Mat4, Vec3], true, "Post-multiplies by a translation matrix.", native_mat4_translate),
    f!("mat4_mul_mat4", Mat4, [Mat4, Mat4], true, "Matrix product.", native_mat4_mul_mat4),
    f!("mat4_mul_vec4", Vec4, [Mat4, Vec4], true, "Matrix-vector product.", native_mat4_mul_vec4),
    f!("mat4_mul_scalar", Mat4, [Mat4, Float], true, "Scales every entry of a mat4.", native_mat4_mul_scalar),
    // texture
    f!("load_image", Texture, [Str], false, "Loads (or reuses) a cached image by path.", native_load_image),
    f!("output_of", Texture, [Str], false, "Current-frame output of the named shader.", native_output_of),
    f!("last_output_of", Texture, [Str], false, "Previous-frame output of the named shader.", native_last_output_of),
    // GUI widgets (impure)
    f!("input_float", Float, [Str, Float], false, "Float input box.", native_input_float),
    f!("input_int", Int, [Str, Int], false, "Int input box.", native_input_int),
    f!("input_vec2", Vec2, [Str, Vec2], false, "vec2 input box.", native_input_vec2),
    f!("input_vec3", Vec3, [Str, Vec3], false, "vec3 input box.", native_input_vec3),
    f!("input_vec4", Vec4, [Str, Vec4], false, "vec4 input box.", native_input_vec4),
    f!("checkbox", Bool, [Str, Bool], false, "Checkbox.", native_checkbox),
    f!("drag_int", Int, [Str, Int, Int, Int], false, "Draggable int in [min, max].", native_drag_int),
    f!("slider_float", Float, [Str, Float, Float, Float], false, "Linear float slider in [min, max].", native_slider_float),
    f!("slider_float_log", Float, [Str, Float, Float, Float], false, "Logarithmic float slider in [min, max].", native_slider_float_log),
    f!("color_picker", Vec4, [Str, Vec4], false, "RGBA color picker.", native_color_picker),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_unique_and_findable() {
        let mut seen = std::collections::HashSet::new();
        for c in CONSTANTS {
            assert!(seen.insert(c.name), "duplicate constant {}", c.name);
        }
        assert_eq!(find_const("PI").unwrap().ty, Type::Float);
        assert!(find_const("NOPE").is_none());
    }

    #[test]
    fn function_names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for func in FUNCTIONS {
            assert!(seen.insert(func.name), "duplicate builtin {}", func.name);
        }
    }

    #[test]
    fn find_func_round_trips_through_index() {
        let (index, entry) = find_func("clamp").unwrap();
        assert_eq!(func_by_index(index).name, entry.name);
    }

    #[test]
    fn time_is_impure_and_sin_is_pure() {
        assert!(!find_func("time").unwrap().1.pure_);
        assert!(find_func("sin").unwrap().1.pure_);
    }
}
