//! Material types for MTL libraries
//!
//! A [`Material`] is a named bag of shading attributes collected from a
//! `newmtl` record and the attribute records that follow it. Two derived
//! descriptors are computed lazily from the attributes and cached: a
//! [`TextureRef`] for the diffuse map and a [`ShadingRef`] for the classic
//! Phong color set. Illumination-model nuances beyond diffuse/ambient/
//! specular/shininess are intentionally not modeled.

use std::cell::OnceCell;
use std::collections::HashMap;

use crate::error::Diagnostic;

/// The closed set of MTL attribute keys this converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialAttr {
    /// Specular exponent
    Ns,
    /// Dissolve (opacity)
    D,
    /// Transparency (inverse dissolve, kept distinct from `d`)
    Tr,
    /// Illumination model
    Illum,
    /// Diffuse color
    Kd,
    /// Ambient color
    Ka,
    /// Specular color
    Ks,
    /// Emissive color
    Ke,
    /// Index of refraction
    Ni,
    /// Diffuse texture map
    MapKd,
    /// Bump/normal map (`map_Bump` or `map_bump`)
    MapBump,
    /// Specular texture map
    MapKs,
    /// Bump map via the bare `bump` directive
    Bump,
}

impl MaterialAttr {
    /// The keyword this attribute uses in MTL files
    pub fn keyword(&self) -> &'static str {
        match self {
            MaterialAttr::Ns => "Ns",
            MaterialAttr::D => "d",
            MaterialAttr::Tr => "Tr",
            MaterialAttr::Illum => "illum",
            MaterialAttr::Kd => "Kd",
            MaterialAttr::Ka => "Ka",
            MaterialAttr::Ks => "Ks",
            MaterialAttr::Ke => "Ke",
            MaterialAttr::Ni => "Ni",
            MaterialAttr::MapKd => "map_Kd",
            MaterialAttr::MapBump => "map_Bump",
            MaterialAttr::MapKs => "map_Ks",
            MaterialAttr::Bump => "bump",
        }
    }
}

/// A stored attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A single float (`Ns`, `d`, `Tr`, `Ni`)
    Scalar(f64),
    /// A single integer (`illum`)
    Int(i64),
    /// A float triple (`Kd`, `Ka`, `Ks`, `Ke`)
    Triple([f64; 3]),
    /// A resolved texture file path (`map_*`, `bump`)
    Path(String),
}

impl AttrValue {
    /// The scalar value, if this is a scalar
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            AttrValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The triple value, if this is a triple
    pub fn as_triple(&self) -> Option<[f64; 3]> {
        match self {
            AttrValue::Triple(v) => Some(*v),
            _ => None,
        }
    }

    /// The path value, if this is a path
    pub fn as_path(&self) -> Option<&str> {
        match self {
            AttrValue::Path(p) => Some(p.as_str()),
            _ => None,
        }
    }
}

/// Texture axis wrap behavior for a [`TextureRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    /// Repeat the texture beyond [0, 1]
    Repeat,
    /// Clamp coordinates to the edge texel
    Clamp,
    /// Mirror on every repetition
    Mirror,
}

/// Texture filtering mode for a [`TextureRef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// Trilinear (mipmapped linear) filtering
    Trilinear,
    /// Plain linear filtering
    Linear,
    /// Nearest-texel filtering
    Nearest,
}

/// Output-representation texture descriptor derived from `map_Kd`
///
/// Wrap and filter settings are fixed defaults of the conversion, not
/// configurable: repeat on both axes, trilinear min/mag filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    /// Descriptor name, `<material_name>_diffuse`
    pub name: String,
    /// Resolved path of the diffuse map
    pub path: String,
    /// Wrap mode on the u axis
    pub wrap_u: WrapMode,
    /// Wrap mode on the v axis
    pub wrap_v: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
}

/// Output-representation shading descriptor derived from the Phong colors
#[derive(Debug, Clone, PartialEq)]
pub struct ShadingRef {
    /// Descriptor name, `<material_name>_mat`
    pub name: String,
    /// Diffuse RGBA from `Kd` (alpha 1.0)
    pub diffuse: Option<[f64; 4]>,
    /// Ambient RGBA from `Ka` (alpha 1.0)
    pub ambient: Option<[f64; 4]>,
    /// Specular RGBA from `Ks` (alpha 1.0)
    pub specular: Option<[f64; 4]>,
    /// Shininess from `Ns`
    pub shininess: Option<f64>,
}

/// A named material parsed from an MTL library
///
/// Created on a `newmtl` record and mutated by subsequent attribute records
/// until the next `newmtl` or end of file. Immutable once the library import
/// completes.
#[derive(Debug, Clone)]
pub struct Material {
    /// Material name, unique within its library
    pub name: String,
    attributes: HashMap<MaterialAttr, AttrValue>,
    texture_ref: OnceCell<TextureRef>,
    shading_ref: OnceCell<ShadingRef>,
}

impl Material {
    /// Create a new material with the standard attribute defaults pre-seeded
    ///
    /// Defaults: `Ns=100.0`, `d=1.0`, `illum=2`, `Kd=[1,0,1]` (diagnostic
    /// magenta), `Ka=Ks=Ke=[0,0,0]`.
    pub fn new(name: impl Into<String>) -> Self {
        let mut attributes = HashMap::new();
        attributes.insert(MaterialAttr::Ns, AttrValue::Scalar(100.0));
        attributes.insert(MaterialAttr::D, AttrValue::Scalar(1.0));
        attributes.insert(MaterialAttr::Illum, AttrValue::Int(2));
        attributes.insert(MaterialAttr::Kd, AttrValue::Triple([1.0, 0.0, 1.0]));
        attributes.insert(MaterialAttr::Ka, AttrValue::Triple([0.0, 0.0, 0.0]));
        attributes.insert(MaterialAttr::Ks, AttrValue::Triple([0.0, 0.0, 0.0]));
        attributes.insert(MaterialAttr::Ke, AttrValue::Triple([0.0, 0.0, 0.0]));
        Self {
            name: name.into(),
            attributes,
            texture_ref: OnceCell::new(),
            shading_ref: OnceCell::new(),
        }
    }

    /// Store an attribute value, replacing any previous value for the key
    pub fn set(&mut self, attr: MaterialAttr, value: AttrValue) {
        self.attributes.insert(attr, value);
    }

    /// Get a stored (or default-seeded) attribute value
    pub fn get(&self, attr: MaterialAttr) -> Option<&AttrValue> {
        self.attributes.get(&attr)
    }

    /// Whether a diffuse texture map (`map_Kd`) is present
    pub fn is_textured(&self) -> bool {
        self.attributes.contains_key(&MaterialAttr::MapKd)
    }

    /// The texture descriptor for this material, if textured
    ///
    /// Built once on first access and cached; repeated calls return the
    /// identical cached object.
    pub fn texture_ref(&self) -> Option<&TextureRef> {
        let path = self.get(MaterialAttr::MapKd)?.as_path()?.to_string();
        Some(self.texture_ref.get_or_init(|| TextureRef {
            name: format!("{}_diffuse", self.name),
            path,
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            min_filter: FilterMode::Trilinear,
            mag_filter: FilterMode::Trilinear,
        }))
    }

    /// The shading descriptor for this material
    ///
    /// Built once on first access and cached; repeated calls return the
    /// identical cached object.
    pub fn shading_ref(&self) -> &ShadingRef {
        self.shading_ref.get_or_init(|| {
            let rgba = |attr: MaterialAttr| {
                self.get(attr)
                    .and_then(AttrValue::as_triple)
                    .map(|[r, g, b]| [r, g, b, 1.0])
            };
            ShadingRef {
                name: format!("{}_mat", self.name),
                diffuse: rgba(MaterialAttr::Kd),
                ambient: rgba(MaterialAttr::Ka),
                specular: rgba(MaterialAttr::Ks),
                shininess: self.get(MaterialAttr::Ns).and_then(AttrValue::as_scalar),
            }
        })
    }

    /// The diffuse color as flat RGBA (alpha 1.0), if `Kd` is defined
    pub fn flat_color(&self) -> Option<[f64; 4]> {
        self.get(MaterialAttr::Kd)
            .and_then(AttrValue::as_triple)
            .map(|[r, g, b]| [r, g, b, 1.0])
    }
}

/// The materials defined by one MTL file
///
/// One instance per `mtllib` reference, owned by the importing document and
/// never mutated after parse.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    /// Materials by name; a repeated `newmtl` name keeps the last definition
    pub materials: HashMap<String, Material>,
    /// Material names in first-definition order
    pub order: Vec<String>,
    /// Non-fatal findings collected while parsing this library
    pub diagnostics: Vec<Diagnostic>,
}

impl MaterialLibrary {
    /// Create a new empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a material; a duplicate name replaces the earlier definition
    pub fn insert(&mut self, material: Material) {
        if !self.materials.contains_key(&material.name) {
            self.order.push(material.name.clone());
        }
        self.materials.insert(material.name.clone(), material);
    }

    /// Look up a material by name
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Number of materials in the library
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the library defines no materials
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
