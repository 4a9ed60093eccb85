use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, DynamicImage, ImageBuffer, Luma};
use qrcode::{EcLevel, QrCode};
use shared::{AppError, Result};
use std::io::Cursor;

/// Configuración del QR impreso en la representación gráfica
pub struct QrConfig {
    /// Píxeles por módulo
    pub module_size: u32,
    /// Margen en módulos
    pub border: u32,
    pub ec_level: EcLevel,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            module_size: 2,
            border: 2,
            ec_level: EcLevel::M,
        }
    }
}

/// Renders the DIAN QR payload (`NumFac: ... CUFE: ...`) as a PNG.
pub struct QrRenderer {
    pub config: QrConfig,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(QrConfig::default())
    }
}

impl QrRenderer {
    pub fn new(config: QrConfig) -> Self {
        Self { config }
    }

    pub fn render_png(&self, data: &str) -> Result<Vec<u8>> {
        let qr = QrCode::with_error_correction_level(data.as_bytes(), self.config.ec_level)
            .map_err(|e| AppError::processing(format!("Error al crear QR code: {}", e)))?;

        let size = self.config.module_size;
        let code = qr
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(size, size)
            .build();

        // qrcode's quiet zone is fixed at 4 modules
        let margin = self.config.border * size;
        let mut canvas = ImageBuffer::from_pixel(
            code.width() + margin * 2,
            code.height() + margin * 2,
            Luma([255u8]),
        );
        imageops::overlay(&mut canvas, &code, margin as i64, margin as i64);

        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(canvas)
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|e| AppError::processing(format!("Error al escribir imagen PNG: {}", e)))?;

        Ok(buffer.into_inner())
    }

    pub fn render_base64(&self, data: &str) -> Result<String> {
        Ok(STANDARD.encode(self.render_png(data)?))
    }
}
