//! # Value 模块
//!
//! 可补间的值类型：二维/三维向量、锚点矩形、颜色。

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 可补间的值
///
/// `lerp` 不截断 `t`：回弹类缓动需要越过端点。
pub trait Tweenable: Copy + PartialEq + std::fmt::Debug + 'static {
    /// 线性插值
    fn lerp(self, to: Self, t: f32) -> Self;

    /// 叠加一个增量（用于方向模式的 `base + delta`）
    fn offset(self, delta: Self) -> Self;
}

impl Tweenable for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn offset(self, delta: Self) -> Self {
        self + delta
    }
}

/// 二维向量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// 创建新的向量
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 零向量
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// 单位向量 (1, 1)
    pub const fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// 分量截断
    pub fn clamp(self, min: Self, max: Self) -> Self {
        Self {
            x: self.x.clamp(min.x, max.x.max(min.x)),
            y: self.y.clamp(min.y, max.y.max(min.y)),
        }
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for (f32, f32) {
    fn from(v: Vec2) -> Self {
        (v.x, v.y)
    }
}

impl Tweenable for Vec2 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn offset(self, delta: Self) -> Self {
        self + delta
    }
}

/// 三维向量（旋转使用欧拉角，单位：度）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Tweenable for Vec3 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }

    fn offset(self, delta: Self) -> Self {
        self + delta
    }
}

/// 锚点矩形（父节点归一化坐标）
///
/// 锚点的最小/最大角作为一个整体补间。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchors {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for Anchors {
    /// 居中锚点
    fn default() -> Self {
        Self::point(Vec2::new(0.5, 0.5))
    }
}

impl Anchors {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// 最小角与最大角重合的锚点
    pub const fn point(at: Vec2) -> Self {
        Self { min: at, max: at }
    }

    /// 零增量（`offset` 的单位元）
    pub const fn zero() -> Self {
        Self::point(Vec2::zero())
    }

    /// 最小角和最大角同时平移
    pub fn shifted(self, by: Vec2) -> Self {
        Self::new(self.min + by, self.max + by)
    }
}

impl Tweenable for Anchors {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self::new(self.min.lerp(to.min, t), self.max.lerp(to.max, t))
    }

    fn offset(self, delta: Self) -> Self {
        Self::new(self.min + delta.min, self.max + delta.max)
    }
}

/// RGBA 颜色，分量范围 0.0 - 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// 替换透明度
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}
