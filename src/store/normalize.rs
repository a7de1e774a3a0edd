//! Forma canônica das linhas lidas do banco
//!
//! Registros antigos chegam em formatos variados: `funcionario` no lugar de
//! `funcionario_id`, objetos embutidos por joins do PostgREST, campos em
//! camelCase, colunas `time` com segundos, agendamentos sem `duracao` ou com
//! `horarios_ocupados` desatualizado. Tudo é resolvido aqui, uma vez, para
//! que o resto do código só veja o formato dos modelos.

use serde_json::{Map, Value};

use super::Tabela;
use crate::agenda::{consecutive_slots, GRANULARIDADE_MINUTOS};

/// Um dia inteiro de horários
const DURACAO_MAXIMA: u32 = 24 * 60;

pub fn normalizar_registro(tabela: Tabela, registro: Value) -> Value {
    let Value::Object(mut campos) = registro else {
        return registro;
    };

    id_como_texto(&mut campos, "id");

    match tabela {
        Tabela::Agenda => normalizar_agendamento(&mut campos),
        Tabela::Funcionarios => {
            renomear(&mut campos, "horarioInicio", "horario_inicio");
            renomear(&mut campos, "horarioFim", "horario_fim");
            for campo in ["horario_inicio", "horario_fim"] {
                truncar_segundos(&mut campos, campo);
            }
        }
        Tabela::Tarefas => {
            renomear(&mut campos, "tempoEstimado", "tempo_estimado");
            renomear(&mut campos, "computarHoras", "computar_horas");
            if campos.get("tempo_estimado").map_or(false, Value::is_null) {
                campos.remove("tempo_estimado");
            }
        }
        Tabela::Demandas => {
            renomear(&mut campos, "funcionario_responsavel_id", "funcionario_id");
            id_como_texto(&mut campos, "funcionario_id");
            id_como_texto(&mut campos, "tarefa_id");
        }
        Tabela::Metas => {
            id_como_texto(&mut campos, "funcionario_id");
        }
        Tabela::Processos => {
            id_como_texto(&mut campos, "tarefa_id");
            if let Some(Value::Number(n)) = campos.get("tempo_estimado") {
                let texto = format!("{} minutos", n);
                campos.insert("tempo_estimado".to_string(), Value::String(texto));
            }
            for lista in ["passos", "observacoes"] {
                if !campos.get(lista).map_or(false, Value::is_array) {
                    campos.insert(lista.to_string(), Value::Array(Vec::new()));
                }
            }
        }
    }

    Value::Object(campos)
}

fn normalizar_agendamento(campos: &mut Map<String, Value>) {
    referencia(campos, "funcionario", "funcionario_id");
    referencia(campos, "tarefa", "tarefa_id");
    renomear(campos, "horarioInicio", "horario");

    truncar_segundos(campos, "horario");
    if let Some(Value::String(data)) = campos.get_mut("data") {
        data.truncate(10);
    }

    let duracao = duracao_coberta(campos.get("duracao"));
    campos.insert("duracao".to_string(), Value::from(duracao));

    if campos.get("status").map_or(true, Value::is_null) {
        campos.insert("status".to_string(), Value::from("nao_iniciada"));
    }

    let horario = campos
        .get("horario")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let atuais: Option<Vec<String>> = campos
        .get("horarios_ocupados")
        .and_then(Value::as_array)
        .map(|v| v.iter().filter_map(|s| s.as_str().map(String::from)).collect());

    // Sem horário legível não há como derivar o intervalo; a linha fica como veio
    let esperados = match consecutive_slots(&horario, duracao) {
        Ok(slots) => slots,
        Err(e) => {
            tracing::warn!("Agendamento com horário inconsistente ({}): {}", horario, e);
            return;
        }
    };

    if atuais.as_ref() != Some(&esperados) {
        campos.insert(
            "horarios_ocupados".to_string(),
            Value::Array(esperados.into_iter().map(Value::String).collect()),
        );
    }
}

/// Duração em múltiplos de 30, arredondada para cima e limitada a um dia.
/// Ausente, zero ou ilegível vira 30.
fn duracao_coberta(valor: Option<&Value>) -> u32 {
    let bruta = match valor {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .filter(|d| *d > 0);

    let Some(bruta) = bruta else {
        return GRANULARIDADE_MINUTOS;
    };

    let coberta = u32::try_from(bruta)
        .unwrap_or(u32::MAX)
        .min(DURACAO_MAXIMA)
        .div_ceil(GRANULARIDADE_MINUTOS)
        * GRANULARIDADE_MINUTOS;
    if u64::from(coberta) != bruta {
        tracing::warn!("Duração {} ajustada para {} minutos", bruta, coberta);
    }
    coberta
}

/// `funcionario: "guido"` ou `funcionario: {id, nome, cor}` viram
/// `funcionario_id: "guido"`; o objeto embutido é descartado.
fn referencia(campos: &mut Map<String, Value>, apelido: &str, campo: &str) {
    if let Some(valor) = campos.remove(apelido) {
        let id = match &valor {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Object(obj) => obj.get("id").and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
            _ => None,
        };

        let ausente = campos.get(campo).map_or(true, Value::is_null);
        if let (true, Some(id)) = (ausente, id) {
            campos.insert(campo.to_string(), Value::String(id));
        }
    }
    id_como_texto(campos, campo);
}

fn renomear(campos: &mut Map<String, Value>, de: &str, para: &str) {
    if let Some(valor) = campos.remove(de) {
        campos.entry(para.to_string()).or_insert(valor);
    }
}

fn id_como_texto(campos: &mut Map<String, Value>, campo: &str) {
    if let Some(Value::Number(n)) = campos.get(campo) {
        let texto = n.to_string();
        campos.insert(campo.to_string(), Value::String(texto));
    }
}

/// Colunas `time` do Postgres chegam como "09:00:00"
fn truncar_segundos(campos: &mut Map<String, Value>, campo: &str) {
    if let Some(Value::String(h)) = campos.get_mut(campo) {
        if h.len() == 8 && h.as_bytes()[2] == b':' && h.as_bytes()[5] == b':' {
            h.truncate(5);
        }
    }
}
