use flipdeck_core::*;

/// Transform for the card above a detail bottom sheet.
///
/// `position` is the sheet's travel from closed (0) towards `0.9 *
/// screen_height`. Closed, the card is enlarged and pushed down; fully open,
/// it shrinks and rides up above the sheet. The translation happens inside
/// the scaled layer.
pub fn sheet_card_transform(position: f32, screen_height: f32) -> Transform {
    let stops = [0.0, 0.4 * screen_height, 0.9 * screen_height];
    let scale = interpolate(position, &stops, &[1.2, 0.85, 0.7], Extrapolation::CLAMP);
    let translate_y = interpolate(
        position,
        &stops,
        &[0.15 * screen_height, -50.0, -120.0],
        Extrapolation::CLAMP,
    );
    Transform::scale(scale).combine(&Transform::translate(0.0, translate_y))
}
