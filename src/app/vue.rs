// src/app/vue.rs
//
// Vue (UI egui) de la fenêtre de chat
// -----------------------------------
// - Historique défilant (bulles utilisateur / assistant)
// - Entrée : Enter envoie (quand le champ est focus)
// - Touches rapides pour les symboles peu pratiques au clavier
// - Réglages : chiffres de lecture, toutes les racines

use chrono::Timelike;
use eframe::egui;

use super::etat::{AppChat, Bulle};
use crate::reglages::CHIFFRES_MAX;

impl AppChat {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Assistant maths");
        ui.add_space(6.0);

        self.ui_reglages(ui);
        ui.separator();

        // l’entrée reste en bas : on réserve sa hauteur avant l’historique
        let hauteur_entree = 96.0;
        let hauteur_historique = (ui.available_height() - hauteur_entree).max(80.0);
        self.ui_historique(ui, hauteur_historique);

        ui.separator();
        self.ui_entree(ui);
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Contrat: C = entrée seulement ; CLR = historique seulement ; AC = tout
            self.bouton_action(ui, "C", "Efface seulement l’entrée", Action::ClearEntree);
            self.bouton_action(ui, "CLR", "Efface l’historique", Action::ClearHistorique);
            self.bouton_action(ui, "AC", "Remise à zéro totale", Action::ResetTotal);

            ui.separator();

            ui.label("Lecture :");
            let mut d = self.session.reglages.chiffres as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut d)
                    .speed(1)
                    .range(0..=CHIFFRES_MAX as u32)
                    .suffix(" digits"),
            );
            if resp.changed() {
                self.set_digits(d as usize);
            }

            let mut toutes = self.session.reglages.toutes_racines;
            if ui.checkbox(&mut toutes, "all roots").changed() {
                self.set_toutes_racines(toutes);
            }
        });
    }

    fn ui_historique(&mut self, ui: &mut egui::Ui, hauteur: f32) {
        let defiler = std::mem::take(&mut self.defiler);
        egui::ScrollArea::vertical()
            .max_height(hauteur)
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if self.historique.is_empty() {
                    ui.weak("Try '2 + 2', 'solve 2x+3=7' or 'x+y=3, x-y=1'.");
                }
                for (i, bulle) in self.historique.iter().enumerate() {
                    Self::bulle(ui, i, bulle);
                }
                if defiler {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    }

    fn bulle(ui: &mut egui::Ui, i: usize, bulle: &Bulle) {
        let (texte, fond, aligne) = match bulle {
            Bulle::Utilisateur(t) => (t, ui.visuals().faint_bg_color, egui::Align::Max),
            Bulle::Assistant(t) => (t, ui.visuals().extreme_bg_color, egui::Align::Min),
        };
        ui.with_layout(egui::Layout::top_down(aligne), |ui| {
            egui::Frame::group(ui.style()).fill(fond).show(ui, |ui| {
                ui.push_id(i, |ui| {
                    ui.monospace(texte.as_str());
                });
            });
        });
    }

    fn ui_entree(&mut self, ui: &mut egui::Ui) {
        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ask a math question, e.g. what is 7 times 4?")
                .id_source("entree_chat"),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter : TextEdit perd le focus en le consommant, d’où lost_focus()
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (resp.has_focus() || resp.lost_focus()) && enter {
            self.envoyer(heure_locale());
        }

        ui.horizontal_wrapped(|ui| {
            for (label, texte) in [
                ("×", " × "),
                ("÷", " ÷ "),
                ("^", "^"),
                ("²", "²"),
                ("√", "sqrt("),
                ("=", " = "),
                ("x", "x"),
                ("y", "y"),
                (",", ", "),
            ] {
                self.bouton_insert(ui, label, texte);
            }

            ui.add_space(10.0);

            let envoyer = ui.add_sized([72.0, 28.0], egui::Button::new("Send"));
            if envoyer.clicked() {
                self.envoyer(heure_locale());
            }
        });
    }

    fn bouton_action(&mut self, ui: &mut egui::Ui, label: &str, tip: &str, action: Action) {
        let resp = ui
            .add_sized([48.0, 26.0], egui::Button::new(label))
            .on_hover_text(tip);

        if resp.clicked() {
            match action {
                Action::ClearEntree => self.clear_entree(),
                Action::ClearHistorique => self.clear_historique(),
                Action::ResetTotal => self.reset_total(),
            }
            self.focus_entree = true;
        }
    }

    fn bouton_insert(&mut self, ui: &mut egui::Ui, label: &str, a_inserer: &str) {
        let resp = ui.add_sized([36.0, 26.0], egui::Button::new(label));
        if resp.clicked() {
            self.entree.push_str(a_inserer);
            self.focus_entree = true;
        }
    }
}

fn heure_locale() -> u32 {
    chrono::Local::now().hour()
}

#[derive(Clone, Copy, Debug)]
enum Action {
    ClearEntree,
    ClearHistorique,
    ResetTotal,
}
