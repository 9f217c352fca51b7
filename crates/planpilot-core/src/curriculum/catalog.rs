//! The built-in Lehrplan 21 competency table.

use crate::models::{Competency, CurriculumSource};

struct Entry {
    id: &'static str,
    code: &'static str,
    area: &'static str,
    competency_area: &'static str,
    competency: &'static str,
    cycle: &'static str,
    level_indicators: &'static [&'static str],
}

const LEHRPLAN21: &[Entry] = &[
    Entry {
        id: "lp21-ma-1a1-z1",
        code: "MA.1.A.1",
        area: "Mathematik",
        competency_area: "Zahl und Variable",
        competency: "Die Schülerinnen und Schüler verstehen und verwenden arithmetische Begriffe und Symbole. Sie lesen und schreiben Zahlen.",
        cycle: "Zyklus 1",
        level_indicators: &["Zahlen bis 20 lesen und schreiben", "Mengen simultan erfassen"],
    },
    Entry {
        id: "lp21-ma-1a2-z1",
        code: "MA.1.A.2",
        area: "Mathematik",
        competency_area: "Zahl und Variable",
        competency: "Die Schülerinnen und Schüler können flexibel zählen, Zahlen nach der Grösse ordnen und Ergebnisse überschlagen.",
        cycle: "Zyklus 1",
        level_indicators: &["vorwärts und rückwärts zählen", "Zahlen der Grösse nach ordnen"],
    },
    Entry {
        id: "lp21-ma-2a1-z1",
        code: "MA.2.A.1",
        area: "Mathematik",
        competency_area: "Form und Raum",
        competency: "Die Schülerinnen und Schüler können Formen und Körper benennen, vergleichen und ordnen.",
        cycle: "Zyklus 1",
        level_indicators: &["Kreis, Dreieck und Quadrat erkennen"],
    },
    Entry {
        id: "lp21-ma-1a2-z2",
        code: "MA.1.A.2",
        area: "Mathematik",
        competency_area: "Zahl und Variable",
        competency: "Die Schülerinnen und Schüler können mit natürlichen Zahlen und Brüchen operieren und Rechenwege darstellen.",
        cycle: "Zyklus 2",
        level_indicators: &["schriftlich addieren und subtrahieren", "Brüche vergleichen und ordnen"],
    },
    Entry {
        id: "lp21-ma-1b1-z2",
        code: "MA.1.B.1",
        area: "Mathematik",
        competency_area: "Zahl und Variable",
        competency: "Die Schülerinnen und Schüler können Rechenwege darstellen, beschreiben, austauschen und nachvollziehen.",
        cycle: "Zyklus 2",
        level_indicators: &["Rechenwege begründen", "Überschlag als Kontrolle nutzen"],
    },
    Entry {
        id: "lp21-ma-3a1-z2",
        code: "MA.3.A.1",
        area: "Mathematik",
        competency_area: "Grössen, Funktionen, Daten und Zufall",
        competency: "Die Schülerinnen und Schüler können Grössen schätzen, messen, umwandeln und runden.",
        cycle: "Zyklus 2",
        level_indicators: &["Längen und Gewichte umrechnen", "Zeitdauern berechnen"],
    },
    Entry {
        id: "lp21-ma-1c1-z3",
        code: "MA.1.C.1",
        area: "Mathematik",
        competency_area: "Zahl und Variable",
        competency: "Die Schülerinnen und Schüler können Terme vereinfachen, Gleichungen aufstellen und lösen sowie Variablen zur Beschreibung von Zusammenhängen nutzen.",
        cycle: "Zyklus 3",
        level_indicators: &["lineare Gleichungen lösen", "Terme mit Variablen umformen"],
    },
    Entry {
        id: "lp21-ma-2b1-z3",
        code: "MA.2.B.1",
        area: "Mathematik",
        competency_area: "Form und Raum",
        competency: "Die Schülerinnen und Schüler können geometrische Beziehungen, insbesondere zwischen Längen, Flächen und Volumen, erforschen, Vermutungen formulieren und begründen.",
        cycle: "Zyklus 3",
        level_indicators: &["Satz des Pythagoras anwenden", "Flächen und Volumen berechnen"],
    },
    Entry {
        id: "lp21-ma-3c1-z3",
        code: "MA.3.C.1",
        area: "Mathematik",
        competency_area: "Grössen, Funktionen, Daten und Zufall",
        competency: "Die Schülerinnen und Schüler können Daten erheben, ordnen, darstellen und interpretieren sowie funktionale Zusammenhänge beschreiben.",
        cycle: "Zyklus 3",
        level_indicators: &["Diagramme erstellen und deuten", "proportionale Zuordnungen erkennen"],
    },
    Entry {
        id: "lp21-d-3a1-z1",
        code: "D.3.A.1",
        area: "Deutsch",
        competency_area: "Sprechen",
        competency: "Die Schülerinnen und Schüler können sich in monologischen Situationen angemessen und verständlich ausdrücken.",
        cycle: "Zyklus 1",
        level_indicators: &["von Erlebnissen erzählen", "Bilder beschreiben"],
    },
    Entry {
        id: "lp21-d-2a1-z2",
        code: "D.2.A.1",
        area: "Deutsch",
        competency_area: "Lesen",
        competency: "Die Schülerinnen und Schüler können Informationen aus Sachtexten entnehmen und Texte mit Bildern, Tabellen und Grafiken verstehen.",
        cycle: "Zyklus 2",
        level_indicators: &["Schlüsselwörter markieren", "Hauptaussagen eines Textes wiedergeben"],
    },
    Entry {
        id: "lp21-d-4b1-z2",
        code: "D.4.B.1",
        area: "Deutsch",
        competency_area: "Schreiben",
        competency: "Die Schülerinnen und Schüler können ihr Schreibprodukt planen und Ideen für einen Text in einer Textsorte sammeln und ordnen.",
        cycle: "Zyklus 2",
        level_indicators: &["Schreibplan erstellen", "Absätze gliedern"],
    },
    Entry {
        id: "lp21-d-3c1-z2",
        code: "D.3.C.1",
        area: "Deutsch",
        competency_area: "Sprechen",
        competency: "Die Schülerinnen und Schüler können sich aktiv an einem Dialog beteiligen und Gesprächsregeln einhalten.",
        cycle: "Zyklus 2",
        level_indicators: &["eigene Meinung begründen", "auf Beiträge anderer eingehen"],
    },
    Entry {
        id: "lp21-d-2b1-z3",
        code: "D.2.B.1",
        area: "Deutsch",
        competency_area: "Lesen",
        competency: "Die Schülerinnen und Schüler können literarische Texte lesen, verstehen und deren Wirkung reflektieren.",
        cycle: "Zyklus 3",
        level_indicators: &["Figuren charakterisieren", "Erzählperspektive erkennen"],
    },
    Entry {
        id: "lp21-d-4d1-z3",
        code: "D.4.D.1",
        area: "Deutsch",
        competency_area: "Schreiben",
        competency: "Die Schülerinnen und Schüler können Argumente in einem Text formulieren, gewichten und zu einer begründeten Stellungnahme verbinden.",
        cycle: "Zyklus 3",
        level_indicators: &["Pro- und Contra-Argumente sammeln", "Erörterung verfassen"],
    },
    Entry {
        id: "lp21-d-5c1-z3",
        code: "D.5.C.1",
        area: "Deutsch",
        competency_area: "Sprache(n) im Fokus",
        competency: "Die Schülerinnen und Schüler können Wortarten und Satzglieder bestimmen und die Grammatik zur Textüberarbeitung nutzen.",
        cycle: "Zyklus 3",
        level_indicators: &["Satzglieder bestimmen", "Zeitformen korrekt verwenden"],
    },
    Entry {
        id: "lp21-nmg-2-1-z1",
        code: "NMG.2.1",
        area: "NMG",
        competency_area: "Tiere, Pflanzen und Lebensräume erkunden",
        competency: "Die Schülerinnen und Schüler können Tiere und Pflanzen in ihren Lebensräumen erkunden und dokumentieren sowie das Zusammenwirken beschreiben.",
        cycle: "Zyklus 1",
        level_indicators: &["Tiere im Schulumfeld beobachten", "Lebensräume beschreiben"],
    },
    Entry {
        id: "lp21-nmg-3-2-z2",
        code: "NMG.3.2",
        area: "NMG",
        competency_area: "Stoffe, Energie und Bewegungen",
        competency: "Die Schülerinnen und Schüler können Energieformen und Energieumwandlungen im Alltag erkennen und beschreiben, etwa im elektrischen Stromkreis.",
        cycle: "Zyklus 2",
        level_indicators: &["einfachen Stromkreis bauen", "Leiter und Nichtleiter unterscheiden"],
    },
    Entry {
        id: "lp21-nmg-4-3-z2",
        code: "NMG.4.3",
        area: "NMG",
        competency_area: "Phänomene der belebten und unbelebten Natur",
        competency: "Die Schülerinnen und Schüler können Wetterphänomene beobachten, Experimente durchführen und Hypothesen prüfen.",
        cycle: "Zyklus 2",
        level_indicators: &["Messreihen protokollieren", "Beobachtungen mit Vermutungen vergleichen"],
    },
    Entry {
        id: "lp21-nmg-9-2-z2",
        code: "NMG.9.2",
        area: "NMG",
        competency_area: "Zeit, Dauer und Wandel",
        competency: "Die Schülerinnen und Schüler können Dauer und Wandel bei sich sowie in der Geschichte erkennen und anhand von Quellen beschreiben.",
        cycle: "Zyklus 2",
        level_indicators: &["Zeitstrahl erstellen", "Quellen unterscheiden"],
    },
    Entry {
        id: "lp21-nt-5-1-z3",
        code: "NT.5.1",
        area: "Natur und Technik",
        competency_area: "Elektrische Energie",
        competency: "Die Schülerinnen und Schüler können elektrische Stromkreise untersuchen, Spannung und Stromstärke messen und Energieumwandlungen erklären.",
        cycle: "Zyklus 3",
        level_indicators: &["Serien- und Parallelschaltung vergleichen", "Ohmsches Gesetz anwenden"],
    },
    Entry {
        id: "lp21-nt-2-1-z3",
        code: "NT.2.1",
        area: "Natur und Technik",
        competency_area: "Naturwissenschaftliches Arbeiten",
        competency: "Die Schülerinnen und Schüler können Experimente planen, durchführen und auswerten sowie Fehlerquellen diskutieren.",
        cycle: "Zyklus 3",
        level_indicators: &["Hypothese formulieren", "Versuchsprotokoll verfassen"],
    },
    Entry {
        id: "lp21-nt-9-2-z3",
        code: "NT.9.2",
        area: "Natur und Technik",
        competency_area: "Ökosysteme",
        competency: "Die Schülerinnen und Schüler können Wechselwirkungen in Ökosystemen analysieren und Folgen menschlicher Eingriffe beurteilen.",
        cycle: "Zyklus 3",
        level_indicators: &["Nahrungsnetze darstellen", "Nachhaltigkeit beurteilen"],
    },
    Entry {
        id: "lp21-rzg-5-1-z3",
        code: "RZG.5.1",
        area: "RZG",
        competency_area: "Schweiz in Tradition und Wandel verstehen",
        competency: "Die Schülerinnen und Schüler können die Entstehung und Entwicklung der Schweiz erklären und Quellen aus verschiedenen Epochen einordnen.",
        cycle: "Zyklus 3",
        level_indicators: &["Epochen zeitlich ordnen", "Quellen kritisch befragen"],
    },
    Entry {
        id: "lp21-rzg-6-1-z3",
        code: "RZG.6.1",
        area: "RZG",
        competency_area: "Weltgeschichtliche Kontinuitäten und Umbrüche erklären",
        competency: "Die Schülerinnen und Schüler können Ursachen und Wirkungen historischer Umbrüche erklären und Multiperspektivität erkennen.",
        cycle: "Zyklus 3",
        level_indicators: &["Ursache und Wirkung unterscheiden", "Perspektiven vergleichen"],
    },
    Entry {
        id: "lp21-rzg-1-2-z3",
        code: "RZG.1.2",
        area: "RZG",
        competency_area: "Natürliche Grundlagen der Erde untersuchen",
        competency: "Die Schülerinnen und Schüler können Wetter und Klima analysieren und Klimadiagramme lesen.",
        cycle: "Zyklus 3",
        level_indicators: &["Klimadiagramme interpretieren", "Klimazonen beschreiben"],
    },
    Entry {
        id: "lp21-erg-2-1-z3",
        code: "ERG.2.1",
        area: "ERG",
        competency_area: "Werte und Normen klären und Entscheidungen verantworten",
        competency: "Die Schülerinnen und Schüler können ethische Fragen erkennen, Werte und Normen vergleichen und eigene Entscheidungen begründen.",
        cycle: "Zyklus 3",
        level_indicators: &["Dilemmata diskutieren", "Interessenkonflikte benennen"],
    },
    Entry {
        id: "lp21-ww-1-1-z3",
        code: "WAH.1.1",
        area: "Wirtschaft, Arbeit, Haushalt",
        competency_area: "Produktions- und Arbeitswelten erkunden",
        competency: "Die Schülerinnen und Schüler können Kommerzialisierung und Marktmechanismen an Beispielen wie dem Profisport untersuchen und beurteilen.",
        cycle: "Zyklus 3",
        level_indicators: &["Angebot und Nachfrage erklären", "Konsumentscheidungen reflektieren"],
    },
    Entry {
        id: "lp21-e-1a1-z2",
        code: "FS1E.1.A.1",
        area: "Englisch",
        competency_area: "Hören",
        competency: "Die Schülerinnen und Schüler können kurze, einfache Gespräche und Hörtexte zu vertrauten Themen verstehen.",
        cycle: "Zyklus 2",
        level_indicators: &["einfache Anweisungen verstehen"],
    },
    Entry {
        id: "lp21-e-4a1-z3",
        code: "FS1E.4.A.1",
        area: "Englisch",
        competency_area: "Schreiben",
        competency: "Die Schülerinnen und Schüler können zusammenhängende Texte zu vertrauten Themen schreiben.",
        cycle: "Zyklus 3",
        level_indicators: &["E-Mail verfassen", "Erlebnisse beschreiben"],
    },
    Entry {
        id: "lp21-mi-1-1-z2",
        code: "MI.1.1",
        area: "Medien und Informatik",
        competency_area: "Leben in der Mediengesellschaft",
        competency: "Die Schülerinnen und Schüler können sich in der physischen Umwelt sowie in medialen und virtuellen Lebensräumen orientieren und sich darin entsprechend den Gesetzen, Regeln und Wertesystemen verhalten.",
        cycle: "Zyklus 2",
        level_indicators: &["Regeln im Internet kennen", "Datenschutz beachten"],
    },
    Entry {
        id: "lp21-mi-2-2-z3",
        code: "MI.2.2",
        area: "Medien und Informatik",
        competency_area: "Informatik",
        competency: "Die Schülerinnen und Schüler können einfache Problemstellungen analysieren, mögliche Lösungsverfahren beschreiben und in Programmen umsetzen.",
        cycle: "Zyklus 3",
        level_indicators: &["Algorithmen beschreiben", "Schleifen und Bedingungen programmieren"],
    },
];

impl Entry {
    fn to_competency(&self) -> Competency {
        Competency {
            id: self.id.to_string(),
            code: self.code.to_string(),
            area: self.area.to_string(),
            competency_area: self.competency_area.to_string(),
            competency: self.competency.to_string(),
            cycle: Some(self.cycle.to_string()),
            level_indicators: self.level_indicators.iter().map(|s| (*s).to_string()).collect(),
            source: CurriculumSource::Lehrplan21,
        }
    }
}

/// An ordered competency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    competencies: Vec<Competency>,
}

impl Catalog {
    /// Wraps an arbitrary competency list, keeping its order.
    pub fn new(competencies: Vec<Competency>) -> Self {
        Self { competencies }
    }

    /// The built-in Lehrplan 21 table.
    pub fn lehrplan21() -> Self {
        Self::new(LEHRPLAN21.iter().map(Entry::to_competency).collect())
    }

    pub fn competencies(&self) -> &[Competency] {
        &self.competencies
    }

    pub fn len(&self) -> usize {
        self.competencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competencies.is_empty()
    }

    /// Looks up a competency by id, falling back to a case-insensitive code
    /// match.
    pub fn find(&self, id_or_code: &str) -> Option<&Competency> {
        self.competencies
            .iter()
            .find(|c| c.id == id_or_code)
            .or_else(|| {
                self.competencies
                    .iter()
                    .find(|c| c.code.eq_ignore_ascii_case(id_or_code))
            })
    }

    /// Distinct areas in catalog order.
    pub fn areas(&self) -> Vec<&str> {
        let mut areas: Vec<&str> = Vec::new();
        for competency in &self.competencies {
            if !areas.contains(&competency.area.as_str()) {
                areas.push(&competency.area);
            }
        }
        areas
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::lehrplan21()
    }
}
