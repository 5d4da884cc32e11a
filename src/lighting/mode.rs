//! Shading variants chosen by the interactive toggles.

/// How the area lights emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightEmission {
    /// Constant colour across every panel
    #[default]
    Untextured,
    /// Light texture stretched over the reference quad
    Textured,
}

impl LightEmission {
    pub fn toggled(self) -> Self {
        match self {
            LightEmission::Untextured => LightEmission::Textured,
            LightEmission::Textured => LightEmission::Untextured,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LightEmission::Untextured => "untextured",
            LightEmission::Textured => "textured",
        }
    }
}

/// Kind of the Blinn-Phong key light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLight {
    #[default]
    Directional,
    Positional,
}

impl KeyLight {
    pub fn toggled(self) -> Self {
        match self {
            KeyLight::Directional => KeyLight::Positional,
            KeyLight::Positional => KeyLight::Directional,
        }
    }

    /// Value written to the shader's key light selector
    pub fn shader_code(self) -> u32 {
        match self {
            KeyLight::Directional => 0,
            KeyLight::Positional => 1,
        }
    }
}

/// Active surface shading variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadingMode {
    pub emission: LightEmission,
    pub key_light: KeyLight,
}

impl ShadingMode {
    /// Flip textured emission. Refused when no light texture is loaded.
    pub fn toggle_emission(&mut self, texture_available: bool) -> bool {
        let next = self.emission.toggled();
        if next == LightEmission::Textured && !texture_available {
            log::warn!("No light texture loaded, staying untextured");
            return false;
        }
        self.emission = next;
        log::info!("Area light emission: {}", self.emission.label());
        true
    }

    pub fn toggle_key_light(&mut self) {
        self.key_light = self.key_light.toggled();
        log::info!("Key light: {:?}", self.key_light);
    }
}
