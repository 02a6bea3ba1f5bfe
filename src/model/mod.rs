//! In-memory model types for OBJ documents and MTL material libraries

mod core;
mod material;

pub use core::{
    DEFAULT_GROUP, DEFAULT_OBJECT, GroupKey, ObjDocument, PrimitiveRecord, TaggedPosition, Vec2,
    Vec3, VertexRef,
};
pub use material::{
    AttrValue, FilterMode, Material, MaterialAttr, MaterialLibrary, ShadingRef, TextureRef,
    WrapMode,
};
