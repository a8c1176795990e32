// src/app.rs
//
// Fenêtre de chat (feature "fenetre")
// -----------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Fournir l’impl eframe::App
// - Lancer la fenêtre native
//
// Important:
// - La gestion Enter est faite dans vue.rs (quand le champ a le focus).

pub mod etat;
pub mod vue;

pub use etat::AppChat;

use eframe::egui;

use crate::conversation::Session;

/// Titre de la fenêtre.
const TITRE_APP: &str = "Assistant maths";

impl eframe::App for AppChat {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = effacer seulement l’entrée (comme bouton "C").
        let esc = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if esc {
            self.clear_entree();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}

/// La fenêtre fermée, la mémoire est écrite (au mieux).
impl Drop for AppChat {
    fn drop(&mut self) {
        self.session.terminer();
    }
}

/// Bloque jusqu’à la fermeture de la fenêtre.
pub fn lancer(session: Session) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([560.0, 740.0])
            .with_min_inner_size([420.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(|_cc| Ok(Box::new(AppChat::nouvelle(session)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}
