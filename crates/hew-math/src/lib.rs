pub mod aabb;
pub mod pca;
pub mod plane;
pub mod ray;

pub use glam::{vec2, vec3, vec4, EulerRot, Mat3, Quat, Vec2, Vec3, Vec4};
pub use aabb::Aabb3;
pub use plane::Plane;
pub use ray::Ray;

pub type Point2 = Vec2;
pub type Point3 = Vec3;
pub type Vector2 = Vec2;
pub type Vector3 = Vec3;
